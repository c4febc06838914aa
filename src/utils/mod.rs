pub mod editor;
pub mod exec;
pub mod logging;
pub mod paths;
#[cfg(test)]
pub mod test_utils;
pub mod url;

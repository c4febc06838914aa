/// What a recognised directive asks the loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    File,
    Save,
    Exit,
    Execute,
    Edit,
    Inline,
}

pub struct DirectiveSpec {
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub kind: DirectiveKind,
}

pub fn all_directives() -> &'static [DirectiveSpec] {
    DIRECTIVES
}

/// Directive names are matched exactly; `!RUN` is not `!run`.
pub fn find_directive(name: &str) -> Option<&'static DirectiveSpec> {
    all_directives()
        .iter()
        .find(|directive| directive.names.contains(&name))
}

const DIRECTIVES: &[DirectiveSpec] = &[
    DirectiveSpec {
        names: &["file"],
        usage: "!file [path]",
        help: "Send a file to the conversation, prompting for the path when omitted.",
        kind: DirectiveKind::File,
    },
    DirectiveSpec {
        names: &["save"],
        usage: "!save",
        help: "Write a collected snippet to disk.",
        kind: DirectiveKind::Save,
    },
    DirectiveSpec {
        names: &["run", "execute"],
        usage: "!run",
        help: "Run a collected snippet (or new code from your editor) and share the output.",
        kind: DirectiveKind::Execute,
    },
    DirectiveSpec {
        names: &["edit"],
        usage: "!edit",
        help: "Edit a collected snippet in $EDITOR and send the result.",
        kind: DirectiveKind::Edit,
    },
    DirectiveSpec {
        names: &["!"],
        usage: "!!<command>",
        help: "Run a shell command and share its output.",
        kind: DirectiveKind::Inline,
    },
    DirectiveSpec {
        names: &["quit", "exit"],
        usage: "!quit",
        help: "Leave halp.",
        kind: DirectiveKind::Exit,
    },
];

use std::fmt::{Display, Formatter};

/// Mutually exclusive top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Home,
    Create,
    List,
    Detail,
}

impl Panel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Create => "create",
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

impl Display for Panel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

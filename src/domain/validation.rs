use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MismatchedRecipients { messages: usize, mobiles: usize },
    MissingEnvVar { var: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MismatchedRecipients { messages, mobiles } => {
                write!(
                    f,
                    "message count does not match recipient count: {messages} messages for {mobiles} mobiles"
                )
            }
            Self::MissingEnvVar { var } => {
                write!(f, "{var} environment variable is required")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

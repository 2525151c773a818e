//! CLI output: user-facing error mapping.

use crate::error::NamespaceError;

/// Map a namespace error to a user-facing message.
pub fn map_error(error: &NamespaceError) -> String {
    match error {
        NamespaceError::LinkNotFound(id) => {
            format!("Error: no such link: {id}")
        }
        NamespaceError::FileNotFound(id) => {
            format!("Error: no such file record: {id}")
        }
        NamespaceError::WrongKind { expected, actual } => {
            format!("Error: expected a {expected} link, got {actual}")
        }
        NamespaceError::InvalidTarget(reason) => {
            format!("Error: invalid target: {reason}")
        }
        NamespaceError::BrokenChain { link, missing } => format!(
            "Error: namespace corruption detected walking up from {link} \
             (ancestor {missing} missing). Run `novafs reconcile`."
        ),
        NamespaceError::Storage(e) => format!("Error: storage failure: {e}"),
        NamespaceError::Io(e) => format!("Error: I/O failure: {e}"),
    }
}

/*!
Error printer that walks the `source()` chain of Snafu errors.
*/

use std::error::Error as StdError;
use std::iter::successors;

/// Joins an error and all of its causes into a single line.
pub fn chain(error: &(dyn StdError + 'static)) -> String {
    successors(Some(error), |&e| e.source())
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Returned from `main` so that a failure prints its whole cause chain.
pub struct Report(Box<dyn StdError>);

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;

        let mut causes = successors(self.0.source(), |&e| e.source()).peekable();
        if causes.peek().is_some() {
            write!(f, "\n\nCaused by:")?;
            for (i, cause) in causes.enumerate() {
                write!(f, "\n  {}: {}", i, cause)?;
            }
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(e: E) -> Self {
        Report(e.into())
    }
}

use itertools::Itertools;

use crate::{id::DefaultIdType, Word};

/// Renders a value in a compact form that is suitable for log output.
pub trait Show {
    /// Returns the rendered representation of `self`.
    fn show(&self) -> String;
}

impl Show for bool {
    fn show(&self) -> String {
        if *self { "+" } else { "-" }.to_string()
    }
}

impl Show for DefaultIdType {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().map(|s| s.show()).join(", "))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            Some(s) => s.show(),
            None => "#".to_string(),
        }
    }
}

impl Show for Word {
    fn show(&self) -> String {
        if self.is_empty() {
            "ε".to_string()
        } else {
            self.symbols().iter().join(".")
        }
    }
}

impl<X: Show, Y: Show> Show for (X, Y) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

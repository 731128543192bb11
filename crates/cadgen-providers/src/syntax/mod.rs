//! Script Syntax Checkers

pub mod python;

pub use python::PythonSyntaxChecker;

//! The selector syntax tree produced by the parser.

mod display;
pub mod selector;
pub mod value;

pub use self::{
    selector::{CombinatorKind, Selector},
    value::{Attribute, ClassName, Literal, Operator, RegexValue, Value},
};

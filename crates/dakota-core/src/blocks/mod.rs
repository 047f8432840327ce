//! Configuration blocks of a Dakota input file
//!
//! Each block owns its settings and renders itself to the fixed-indentation
//! text Dakota expects. Blocks never reference each other; the
//! [`Experiment`](crate::experiment::Experiment) wires them together.

pub mod environment;
pub mod interface;
pub mod method;
pub mod responses;
pub mod variables;

pub use environment::Environment;
pub use interface::{ForkSettings, Interface, InterfaceKind};
pub use method::{
    BasisPolynomialFamily, Levels, Method, MethodCommon, MethodKind, Quadrature, SampleType,
    UncertaintySettings,
};
pub use responses::Responses;
pub use variables::{Variables, VariablesKind};

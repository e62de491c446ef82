//! Tensor descriptors: shape, layout, datatype and the work distribution
//! derived from them.

pub mod desc;
pub mod dtype;
pub mod layout;
pub mod shape;
pub mod work_groups;

pub use desc::TensorDesc;
pub use dtype::Datatype;
pub use layout::{AxisGroup, DataLayout};
pub use shape::{align_up, TensorShape};
pub use work_groups::{AxisAssignment, TensorFriendly, WorkDistribution, WorkGroups};

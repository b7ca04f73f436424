//! Safety layer root.
//!
//! Drive-range target selection and stopping-distance speed capping.

pub mod decelerate;
pub mod optimize;

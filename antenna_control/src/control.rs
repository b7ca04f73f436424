//! Control engine root.
//!
//! Drive-speed controller: feed-forward + PID with acceleration and speed
//! limiting. One controller instance per axis.

pub mod pid;

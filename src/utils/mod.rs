pub mod consts;
pub mod logging;

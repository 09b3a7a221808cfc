// Domain layer: menu and profile models plus the ports the run depends on.

pub mod model;
pub mod ports;

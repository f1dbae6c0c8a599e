// Domain layer: orders, certificates and the order source port.

pub mod model;
pub mod ports;

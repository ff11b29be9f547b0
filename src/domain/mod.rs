// Domain layer: entities read from the host system and the ports used to read them.

pub mod model;
pub mod ports;

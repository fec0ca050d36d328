// Domain layer: report models, their validation pass and the ports the pipeline talks through.

pub mod alerts;
pub mod decode;
pub mod issues;
pub mod ports;
pub mod sites;

pub mod chord;
pub mod complexity;
pub mod fraction;
pub mod limit;
pub mod math;
pub mod voicing;

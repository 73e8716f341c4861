pub mod constants;
pub mod full_math;
pub mod price_curve;

pub mod circle;
pub mod clock;
pub mod constants;
pub mod match_result;
pub mod state;
pub mod systems;
pub mod world;

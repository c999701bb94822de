pub mod movement;
pub mod enemy;
pub mod player;
pub mod health;

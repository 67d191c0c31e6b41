//! Default value functions for serde deserialization.

use crate::filter::EvaluationMode;
use crate::geometry::Rectangle;

pub fn particle_count() -> usize {
    16384
}

pub fn seed() -> u64 {
    1
}

pub fn distance_sigma() -> f32 {
    0.2
}

pub fn bearing_sigma() -> f32 {
    0.05
}

pub fn field() -> Rectangle {
    Rectangle::centered(6000.0, 4000.0)
}

pub fn grass() -> Rectangle {
    Rectangle::centered(6800.0, 4400.0)
}

pub fn landmarks() -> Vec<[f32; 2]> {
    vec![[2600.0, 700.0], [2600.0, -700.0], [2000.0, -1000.0]]
}

pub fn robot_position() -> [f32; 2] {
    [1500.0, 1500.0]
}

pub fn robot_heading() -> f32 {
    0.0
}

pub fn ideal_fps() -> f32 {
    30.0
}

pub fn mode() -> EvaluationMode {
    EvaluationMode::Simd
}

pub fn comparison_window() -> usize {
    5
}

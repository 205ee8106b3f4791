//! Rack layout
//!
//! Racks sit on a half circle in front of the hoop. Rack 0 is always the one
//! on the free-throw line; the rest alternate from one side of it to the
//! other, stepping further out around the arc each time.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::consts::{PARK_X, PARK_Y, PARK_Z};
use crate::polar_to_xz;
use crate::settings::Settings;

/// Rack positions (y = 0), ordered center-out
pub fn rack_positions(settings: &Settings) -> Vec<Vec3> {
    let racks = settings.total_racks.max(1);
    let ground = Vec3::new(settings.ring_position.x, 0.0, settings.ring_position.z);

    if racks == 1 {
        return vec![polar_to_xz(ground, settings.rack_distance, FRAC_PI_2)];
    }

    let step = PI / (racks - 1) as f32;
    let arc: Vec<Vec3> = (0..racks)
        .map(|i| polar_to_xz(ground, settings.rack_distance, i as f32 * step))
        .collect();

    let center = racks / 2;
    let mut ordered = Vec::with_capacity(racks);
    ordered.push(arc[center]);

    let mut offset = 1;
    while ordered.len() < racks {
        if center + offset < racks {
            ordered.push(arc[center + offset]);
        }
        if offset <= center {
            ordered.push(arc[center - offset]);
        }
        offset += 1;
    }

    ordered
}

/// Rack a ball is served from
pub fn rack_index(ball: usize, settings: &Settings) -> usize {
    let racks = settings.total_racks.max(1);
    let per_rack = (settings.total_balls / racks).max(1);
    (ball / per_rack).min(racks - 1)
}

/// Resting position of a ball on its rack
pub fn spawn_position(ball: usize, racks: &[Vec3], settings: &Settings) -> Vec3 {
    let rack = racks
        .get(rack_index(ball, settings))
        .copied()
        .unwrap_or(Vec3::ZERO);
    Vec3::new(rack.x, settings.spawn_height, rack.z)
}

/// Off-screen parking spot, unique per ball
pub fn park_position(ball: usize) -> Vec3 {
    Vec3::new(PARK_X, PARK_Y - ball as f32, PARK_Z)
}

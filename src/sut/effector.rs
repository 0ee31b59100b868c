//! Effector/pressure curve blob encoder (C7) and `Manager.PressureGraph`
//! default.

use super::bytes::{push_f32_le, push_u32_le};

/// A single point on a pressure curve, `0.0..=1.0` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressurePoint {
    pub x: f32,
    pub y: f32,
}

/// The default curve used when a pressure effector is enabled without an
/// explicit one: a straight line from (0,0) to (1,1).
pub fn default_curve() -> Vec<PressurePoint> {
    vec![
        PressurePoint { x: 0.0, y: 0.0 },
        PressurePoint { x: 1.0, y: 1.0 },
    ]
}

const MAX_POINTS: usize = 10;

/// Encodes a pressure effector BLOB, or `None` when the effector is off
/// (the column should be left NULL per spec.md §4.7).
pub fn encode_effector(enabled: bool, curve: &[PressurePoint]) -> Option<Vec<u8>> {
    if !enabled {
        return None;
    }

    let points: &[PressurePoint] = if curve.len() > MAX_POINTS {
        &curve[..MAX_POINTS]
    } else {
        curve
    };

    let mut buf = Vec::with_capacity(12 + points.len() * 8);
    push_u32_le(&mut buf, 1); // enabled
    push_u32_le(&mut buf, 0); // mode
    push_u32_le(&mut buf, points.len() as u32);
    for p in points {
        push_f32_le(&mut buf, p.x.clamp(0.0, 1.0));
        push_f32_le(&mut buf, p.y.clamp(0.0, 1.0));
    }
    Some(buf)
}

/// The fixed 16-byte default `Manager.PressureGraph` value (spec.md §4.7):
/// a two-point linear graph from (0,0) to (1,1).
pub fn default_pressure_graph() -> Vec<u8> {
    let mut buf = Vec::with_capacity(16);
    push_u32_le(&mut buf, 2);
    push_u32_le(&mut buf, 0);
    push_f32_le(&mut buf, 0.0);
    push_f32_le(&mut buf, 0.0);
    push_f32_le(&mut buf, 1.0);
    push_f32_le(&mut buf, 1.0);
    buf
}

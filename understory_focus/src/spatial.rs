// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional candidate scoring.

use kurbo::{Point, Rect};

use crate::Direction;

/// Pick the candidate nearest to `origin` in `direction`.
///
/// Only candidates whose center lies strictly in the forward half-plane are considered. The
/// score favors closeness along the movement axis and penalizes off-axis drift four times as
/// much, so a candidate straight ahead wins over a closer one diagonally off to the side.
/// Ties keep the earlier candidate. [`Direction::Home`] and [`Direction::End`] have no spatial
/// meaning and always yield `None`.
pub fn nearest_in_direction<K>(
    origin: Point,
    direction: Direction,
    candidates: impl IntoIterator<Item = (K, Rect)>,
) -> Option<K> {
    let mut best: Option<K> = None;
    let mut best_score = f64::INFINITY;

    for (id, rect) in candidates {
        let cc = rect.center();
        let dx = cc.x - origin.x;
        let dy = cc.y - origin.y;

        let (primary, secondary, forward_sign) = match direction {
            Direction::Right => (dx, dy, 1.0),
            Direction::Left => (dx, dy, -1.0),
            Direction::Down => (dy, dx, 1.0),
            Direction::Up => (dy, dx, -1.0),
            Direction::Home | Direction::End => return None,
        };

        // Restrict to the forward hemiplane.
        if forward_sign * primary <= 0.0 {
            continue;
        }

        let score = primary.abs() + 4.0 * secondary.abs();
        if !score.is_finite() {
            continue;
        }
        if score < best_score {
            best_score = score;
            best = Some(id);
        }
    }

    best
}

/// Origin for a directional move out of `rect`, with the perpendicular axis pinned to the sticky
/// coordinate when one is remembered.
pub fn sticky_origin(
    rect: Rect,
    direction: Direction,
    sticky_x: Option<f64>,
    sticky_y: Option<f64>,
) -> Point {
    let c = rect.center();
    if direction.is_vertical() {
        Point::new(sticky_x.unwrap_or(c.x), c.y)
    } else if direction.is_horizontal() {
        Point::new(c.x, sticky_y.unwrap_or(c.y))
    } else {
        c
    }
}

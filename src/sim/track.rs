//! Track and sprite assets as seen by the simulation
//!
//! The asset layer decodes images into masks; this module only validates the
//! pieces and keeps them together.

use glam::{IVec2, Vec2};
use thiserror::Error;

use super::mask::Mask;
use crate::consts::{FINISH_POSITION, SEAT_ONE_START, SEAT_TWO_START, STOCK_PATH};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("waypoint path is empty")]
    EmptyPath,
    #[error("{0} mask has no solid pixels")]
    EmptyMask(&'static str),
    #[error("alpha buffer holds {actual} pixels, expected {expected}")]
    AlphaSize { expected: usize, actual: usize },
}

/// A race track: walls, finish band and the AI/collectible waypoint loop
#[derive(Debug, Clone)]
pub struct Track {
    boundary: Mask,
    finish: Mask,
    finish_origin: IVec2,
    waypoints: Vec<Vec2>,
    starts: [Vec2; 2],
}

impl Track {
    pub fn new(
        boundary: Mask,
        finish: Mask,
        finish_origin: IVec2,
        waypoints: Vec<Vec2>,
    ) -> Result<Self, TrackError> {
        if waypoints.is_empty() {
            return Err(TrackError::EmptyPath);
        }
        if finish.is_empty() {
            return Err(TrackError::EmptyMask("finish"));
        }
        Ok(Self {
            boundary,
            finish,
            finish_origin,
            waypoints,
            starts: [SEAT_ONE_START, SEAT_TWO_START],
        })
    }

    /// Override the grid slots (seat one, seat two / AI)
    pub fn with_starts(mut self, seat_one: Vec2, seat_two: Vec2) -> Self {
        self.starts = [seat_one, seat_two];
        self
    }

    pub fn boundary(&self) -> &Mask {
        &self.boundary
    }

    pub fn finish(&self) -> &Mask {
        &self.finish
    }

    pub fn finish_origin(&self) -> IVec2 {
        self.finish_origin
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Grid slot for seat index 0 or 1
    pub fn start(&self, index: usize) -> Vec2 {
        self.starts[index.min(1)]
    }

    /// Waypoint loop of the stock track
    pub fn stock_path() -> Vec<Vec2> {
        STOCK_PATH.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    /// The stock track from its decoded masks: stock finish placement,
    /// waypoint loop and grid slots
    pub fn stock(boundary: Mask, finish: Mask) -> Result<Self, TrackError> {
        Self::new(boundary, finish, FINISH_POSITION, Self::stock_path())
    }

    /// Procedural rectangular ring used by the headless driver and tests.
    ///
    /// 800x800 field; the road is the band between the outer rectangle
    /// (40..760) and the inner block (200..600). Cars start on the left
    /// straight facing up; the finish band spans that straight at y = 400,
    /// so a lap runs clockwise on screen and crosses the band moving up.
    pub fn ring() -> Result<Self, TrackError> {
        const OUTER: (u32, u32) = (40, 760);
        const INNER: (u32, u32) = (200, 600);
        let boundary = Mask::from_fn(800, 800, |x, y| {
            let outside = x < OUTER.0 || x >= OUTER.1 || y < OUTER.0 || y >= OUTER.1;
            let island = x >= INNER.0 && x < INNER.1 && y >= INNER.0 && y < INNER.1;
            outside || island
        });
        let finish = Mask::full(INNER.0 - OUTER.0, 8);
        let waypoints = vec![
            Vec2::new(110.0, 110.0),
            Vec2::new(400.0, 100.0),
            Vec2::new(680.0, 110.0),
            Vec2::new(680.0, 400.0),
            Vec2::new(680.0, 660.0),
            Vec2::new(400.0, 670.0),
            Vec2::new(110.0, 660.0),
            Vec2::new(110.0, 390.0),
        ];
        Ok(Self::new(boundary, finish, IVec2::new(OUTER.0 as i32, 400), waypoints)?
            .with_starts(Vec2::new(140.0, 320.0), Vec2::new(70.0, 320.0)))
    }
}

/// Collision masks for the two cars in a race
#[derive(Debug, Clone)]
pub struct CarSprites {
    /// Seat one
    pub primary: Mask,
    /// Seat two or the AI
    pub rival: Mask,
}

impl CarSprites {
    pub fn new(primary: Mask, rival: Mask) -> Self {
        Self { primary, rival }
    }

    /// A 20x36 car silhouette with clipped corners, for both cars
    pub fn silhouette() -> Self {
        let body = Mask::from_fn(20, 36, |x, y| {
            let corner = (x < 2 || x >= 18) && (y < 3 || y >= 33);
            !corner
        });
        Self::new(body.clone(), body)
    }

    pub fn size_of(mask: &Mask) -> Vec2 {
        Vec2::new(mask.width() as f32, mask.height() as f32)
    }
}

//! # Controller data
//!
//! Moving averages of the angles used by guidance. Angles are averaged on the unit circle (mean
//! of sines and cosines) so that readings either side of +/-pi average to pi rather than to zero.
//!
//! Alpha is the angle between the true wind direction and the boat heading, wrapped into
//! (-pi, pi]. A negative alpha means the wind comes over the port side, i.e. the boat is sailing
//! on port haul.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fixed capacity window of angles.
#[derive(Debug, Clone, Serialize)]
pub struct AngleWindow {
    samples_rad: Vec<f32>,

    capacity: usize,

    /// Index the next sample will be written to once the window is full
    next: usize,
}

/// Smoothed signals read by guidance every cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerData {
    /// Course over ground
    cog: AngleWindow,

    /// Heading from the attitude estimator
    yaw: AngleWindow,

    /// True wind direction
    twd: AngleWindow,

    /// Apparent wind angle
    app_wind: AngleWindow,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AngleWindow {
    /// Create a new empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            samples_rad: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    /// Add a sample, replacing the oldest one if the window is full.
    pub fn push(&mut self, angle_rad: f32) {
        if !angle_rad.is_finite() {
            return;
        }

        if self.samples_rad.len() < self.capacity {
            self.samples_rad.push(angle_rad);
        } else {
            self.samples_rad[self.next] = angle_rad;
            self.next = (self.next + 1) % self.capacity;
        }
    }

    /// Circular mean of the samples in the window, zero if the window is empty.
    pub fn mean(&self) -> f32 {
        let (sum_sin, sum_cos) = self
            .samples_rad
            .iter()
            .fold((0f32, 0f32), |(s, c), a| (s + a.sin(), c + a.cos()));

        sum_sin.atan2(sum_cos)
    }

    pub fn len(&self) -> usize {
        self.samples_rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_rad.is_empty()
    }
}

impl ControllerData {
    /// Create the controller data, averaging over the last `window_len` samples of each signal.
    pub fn new(window_len: usize) -> Self {
        if window_len == 0 {
            warn!("Moving average window of zero samples requested, using one sample");
        }

        Self {
            cog: AngleWindow::new(window_len),
            yaw: AngleWindow::new(window_len),
            twd: AngleWindow::new(window_len),
            app_wind: AngleWindow::new(window_len),
        }
    }

    /// Add a new course over ground reading.
    pub fn update_cog(&mut self, cog_rad: f32) {
        self.cog.push(cog_rad);
    }

    /// Add a new heading reading.
    pub fn update_yaw(&mut self, yaw_rad: f32) {
        self.yaw.push(yaw_rad);
    }

    /// Add a new true wind direction reading.
    pub fn update_twd(&mut self, twd_rad: f32) {
        self.twd.push(twd_rad);
    }

    /// Add a new apparent wind angle reading.
    pub fn update_app_wind(&mut self, app_wind_rad: f32) {
        self.app_wind.push(app_wind_rad);
    }

    /// Alpha computed from the course over ground.
    pub fn get_alpha(&self) -> f32 {
        wrap_pi(self.twd.mean() - self.cog.mean())
    }

    /// Alpha computed from the heading.
    ///
    /// The heading is updated far more often than the course over ground, so this is the alpha
    /// used during fast maneuvers such as tacks.
    pub fn get_alpha_yaw(&self) -> f32 {
        wrap_pi(self.twd.mean() - self.yaw.mean())
    }

    /// Mean apparent wind angle.
    pub fn get_app_wind(&self) -> f32 {
        self.app_wind.mean()
    }

    /// Mean true wind direction.
    pub fn get_twd(&self) -> f32 {
        self.twd.mean()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_empty() {
        let data = ControllerData::new(5);

        assert_eq!(data.get_alpha(), 0.0);
        assert_eq!(data.get_alpha_yaw(), 0.0);
        assert_eq!(data.get_app_wind(), 0.0);
        assert_eq!(data.get_twd(), 0.0);
    }

    #[test]
    fn test_window_rolls_over() {
        let mut win = AngleWindow::new(3);

        for a in [0.1, 0.2, 0.3, 0.4, 0.5].iter() {
            win.push(*a);
        }

        assert_eq!(win.len(), 3);
        assert_abs_diff_eq!(win.mean(), 0.4, epsilon = 1e-3);

        // NaN readings are ignored
        win.push(std::f32::NAN);
        assert_abs_diff_eq!(win.mean(), 0.4, epsilon = 1e-3);

        let mut win = AngleWindow::new(0);
        win.push(1.0);
        win.push(-1.0);
        assert_eq!(win.len(), 1);
        assert_abs_diff_eq!(win.mean(), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_across_south() {
        let mut win = AngleWindow::new(4);

        win.push(PI - 0.1);
        win.push(-PI + 0.1);

        assert_abs_diff_eq!(win.mean().abs(), PI, epsilon = 1e-5);
    }

    #[test]
    fn test_alpha_sign() {
        let mut data = ControllerData::new(1);

        // Wind from the North, heading North-East: wind over the port bow
        data.update_twd(0.0);
        data.update_cog(PI / 4.0);
        data.update_yaw(PI / 4.0);
        assert_abs_diff_eq!(data.get_alpha(), -PI / 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(data.get_alpha_yaw(), -PI / 4.0, epsilon = 1e-6);

        // Heading North-West: starboard haul
        data.update_cog(-PI / 4.0);
        assert_abs_diff_eq!(data.get_alpha(), PI / 4.0, epsilon = 1e-6);

        // Wraps around
        data.update_twd(3.0);
        data.update_cog(-3.0);
        assert_abs_diff_eq!(data.get_alpha(), 6.0 - 2.0 * PI, epsilon = 1e-5);
    }
}

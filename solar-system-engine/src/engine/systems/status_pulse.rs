use bevy::prelude::*;
use constants::render_settings::{STATUS_PULSE_BAR_WIDTH, STATUS_PULSE_INTERVAL, STATUS_PULSE_WRAP};

/// Heartbeat counter behind the HUD status indicator.
#[derive(Resource, Debug, Default)]
pub struct StatusPulse {
    pub value: u32,
    elapsed: f32,
}

impl StatusPulse {
    pub fn tick(&mut self, delta: f32) {
        self.elapsed += delta.max(0.0);
        while self.elapsed >= STATUS_PULSE_INTERVAL {
            self.elapsed -= STATUS_PULSE_INTERVAL;
            self.value = (self.value + 1) % STATUS_PULSE_WRAP;
        }
    }

    /// `[==   ]` style bar, one segment per tick.
    pub fn bar(&self) -> String {
        let filled = (self.value % STATUS_PULSE_BAR_WIDTH) as usize;
        let empty = STATUS_PULSE_BAR_WIDTH as usize - filled;
        format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
    }
}

pub fn tick_status_pulse(time: Res<Time>, mut pulse: ResMut<StatusPulse>) {
    pulse.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_every_half_second() {
        let mut pulse = StatusPulse::default();
        pulse.tick(0.4);
        assert_eq!(pulse.value, 0);
        pulse.tick(0.2);
        assert_eq!(pulse.value, 1);
        pulse.tick(1.0);
        assert_eq!(pulse.value, 3);
    }

    #[test]
    fn test_wraps_at_hundred() {
        let mut pulse = StatusPulse {
            value: 99,
            elapsed: 0.0,
        };
        pulse.tick(STATUS_PULSE_INTERVAL);
        assert_eq!(pulse.value, 0);
    }

    #[test]
    fn test_bar_rendering() {
        let pulse = |value| StatusPulse { value, elapsed: 0.0 };
        assert_eq!(pulse(0).bar(), "[     ]");
        assert_eq!(pulse(3).bar(), "[===  ]");
        assert_eq!(pulse(7).bar(), "[==   ]");
    }
}

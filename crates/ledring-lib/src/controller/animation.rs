//! Ring animations — single-LED chase and rotation of the current colors.

use std::time::Duration;

use super::LedController;
use crate::color::{self, BLACK};
use crate::error::{LedringError, Result};
use crate::service::LightService;
use crate::wait::Sleeper;

impl<S: LightService, W: Sleeper> LedController<S, W> {
    /// Chase one lit LED around the ring `turns` times, then leave all off.
    ///
    /// Each step turns the current LED off before lighting the next, so at
    /// most one ring LED is on at a time. `turns <= 0` only clears the ring.
    pub fn spinning_led(&self, color: &str, turns: i32, delay: Duration) -> Result<()> {
        let color = color::normalize_color(color)?;

        self.turn_off_all_leds()?;
        if turns <= 0 {
            return Ok(());
        }

        let mut current = 0;
        self.service.set_one(self.ring[current], &color, true)?;

        let total_steps = turns as usize * self.ring.len();
        for step in 1..=total_steps {
            self.sleeper.sleep(delay)?;
            self.service.set_one(self.ring[current], BLACK, false)?;
            if step == total_steps {
                break;
            }
            current = self.ring.next_index(current);
            self.service.set_one(self.ring[current], &color, true)?;
        }

        self.turn_off_all_leds()
    }

    /// Rotate the ring's existing colors and power states one position
    /// clockwise per step.
    ///
    /// Every ring light is re-set on every step. Fails with `NotFound` before
    /// any write if a ring id is missing from the service.
    pub fn spinning_wheel(&self, steps: i32, delay: Duration) -> Result<()> {
        if steps <= 0 {
            return Ok(());
        }

        let lights = self.service.get_all()?.lights;
        let mut states = self
            .ring
            .ids()
            .iter()
            .map(|&id| -> Result<(String, bool)> {
                let light = lights
                    .iter()
                    .find(|l| l.id == id)
                    .ok_or_else(|| LedringError::NotFound(format!("ring light {id} not found")))?;
                Ok((light.normalized_color()?, light.on))
            })
            .collect::<Result<Vec<_>>>()?;

        for step in 0..steps {
            states.rotate_right(1);
            for (&id, (color, on)) in self.ring.ids().iter().zip(&states) {
                self.service.set_one(id, color, *on)?;
            }
            if step + 1 < steps {
                self.sleeper.sleep(delay)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::GroupLedSet;
    use crate::light::Light;
    use crate::service::mock::{Event, MockLightService, journal};
    use crate::wait::mock::RecordingSleeper;

    const DELAY: Duration = Duration::from_millis(5);

    fn off(id: u32) -> Event {
        Event::set(id, "#000000", false)
    }

    fn ring_lights(colors: &[&str], states: &[bool]) -> Vec<Light> {
        (20..28)
            .zip(colors.iter().zip(states))
            .map(|(id, (c, s))| Light::new(id, c, *s).in_group("G"))
            .collect()
    }

    #[test]
    fn spinning_led_one_turn_exact_sequence() {
        let j = journal();
        let svc = MockLightService::new(j.clone());
        let sleeper = RecordingSleeper::with_journal(j.clone());
        let ctl = LedController::new(&svc, &sleeper, GroupLedSet::default());

        ctl.spinning_led("#ff0000", 1, DELAY).unwrap();

        let mut expected: Vec<Event> = (20..=27).map(off).collect();
        expected.push(Event::set(20, "#ff0000", true));
        for id in 20..27 {
            expected.push(Event::Sleep(DELAY));
            expected.push(off(id));
            expected.push(Event::set(id + 1, "#ff0000", true));
        }
        expected.push(Event::Sleep(DELAY));
        expected.push(off(27));
        expected.extend((20..=27).map(off));

        assert_eq!(*j.borrow(), expected);
        assert_eq!(sleeper.count(), 8);
    }

    #[test]
    fn spinning_led_each_id_lit_once_per_turn() {
        let svc = MockLightService::new(journal());
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());
        ctl.spinning_led("red", 2, DELAY).unwrap();

        for id in 20..=27 {
            let ons = svc
                .sets()
                .iter()
                .filter(|(i, c, on)| *i == id && c == "#ff0000" && *on)
                .count();
            assert_eq!(ons, 2, "id {id}");
        }
        // 8 clear + 1 first on + 16 offs + 15 ons + 8 clear
        assert_eq!(svc.sets().len(), 48);
    }

    #[test]
    fn spinning_led_at_most_one_lit() {
        let svc = MockLightService::new(journal());
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());
        ctl.spinning_led("#00ff00", 3, DELAY).unwrap();

        let mut lit = std::collections::HashSet::new();
        for (id, _, on) in svc.sets() {
            if on {
                lit.insert(id);
            } else {
                lit.remove(&id);
            }
            assert!(lit.len() <= 1);
        }
        assert!(lit.is_empty());
    }

    #[test]
    fn spinning_led_zero_turns_only_clears() {
        let j = journal();
        let svc = MockLightService::new(j.clone());
        let sleeper = RecordingSleeper::with_journal(j.clone());
        let ctl = LedController::new(&svc, &sleeper, GroupLedSet::default());

        ctl.spinning_led("#00ff00", 0, Duration::from_millis(10)).unwrap();
        ctl.spinning_led("#00ff00", -3, Duration::from_millis(10)).unwrap();

        let expected: Vec<Event> = (20..=27).chain(20..=27).map(off).collect();
        assert_eq!(*j.borrow(), expected);
        assert_eq!(sleeper.count(), 0);
    }

    #[test]
    fn spinning_led_interrupted_stops_without_cleanup() {
        let svc = MockLightService::new(journal());
        let sleeper = RecordingSleeper::new();
        sleeper.interrupt_at.set(Some(2));
        let ctl = LedController::new(&svc, &sleeper, GroupLedSet::default());

        let err = ctl.spinning_led("#ff0000", 1, DELAY).unwrap_err();
        assert!(matches!(err, LedringError::Interrupted));
        // 8 clear + first on + 2 full steps (off, on)
        assert_eq!(svc.sets().len(), 8 + 1 + 4);
    }

    #[test]
    fn spinning_led_bad_color_makes_no_calls() {
        let svc = MockLightService::new(journal());
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());
        assert!(ctl.spinning_led("not-a-color", 1, DELAY).is_err());
        assert!(svc.events().is_empty());
    }

    #[test]
    fn spinning_wheel_single_step_rotates_right() {
        let colors = [
            "#000001", "#000002", "#000003", "#000004", "#000005", "#000006", "#000007",
            "#000008",
        ];
        let states = [true, false, true, false, true, true, false, false];
        let j = journal();
        let svc = MockLightService::with_lights(j.clone(), ring_lights(&colors, &states));
        let sleeper = RecordingSleeper::with_journal(j.clone());
        let ctl = LedController::new(&svc, &sleeper, GroupLedSet::default());

        ctl.spinning_wheel(1, DELAY).unwrap();

        let mut expected = vec![Event::GetAll];
        for (pos, id) in (20..28).enumerate() {
            let src = (pos + 7) % 8;
            expected.push(Event::set(id, colors[src], states[src]));
        }
        assert_eq!(*j.borrow(), expected);
        assert_eq!(sleeper.count(), 0);
    }

    #[test]
    fn spinning_wheel_sleeps_between_steps_only() {
        let colors = ["#ff0000"; 8];
        let states = [true; 8];
        let svc = MockLightService::with_lights(journal(), ring_lights(&colors, &states));
        let sleeper = RecordingSleeper::new();
        let ctl = LedController::new(&svc, &sleeper, GroupLedSet::default());

        ctl.spinning_wheel(3, DELAY).unwrap();
        assert_eq!(svc.sets().len(), 24);
        assert_eq!(*sleeper.sleeps.borrow(), vec![DELAY, DELAY]);
    }

    #[test]
    fn spinning_wheel_full_cycle_restores_original() {
        let colors = [
            "#110000", "#220000", "#330000", "#440000", "#550000", "#660000", "#770000",
            "#880000",
        ];
        let states = [true, false, true, false, true, false, true, false];
        let svc = MockLightService::with_lights(journal(), ring_lights(&colors, &states));
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());

        ctl.spinning_wheel(8, DELAY).unwrap();
        let sets = svc.sets();
        let last_round = &sets[sets.len() - 8..];
        for (i, (id, color, on)) in last_round.iter().enumerate() {
            assert_eq!(*id, 20 + i as u32);
            assert_eq!(color, colors[i]);
            assert_eq!(*on, states[i]);
        }
    }

    #[test]
    fn spinning_wheel_missing_ring_id_is_not_found() {
        let mut lights = ring_lights(&["#000000"; 8], &[false; 8]);
        lights.retain(|l| l.id != 24);
        let svc = MockLightService::with_lights(journal(), lights);
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());

        let err = ctl.spinning_wheel(2, DELAY).unwrap_err();
        assert!(matches!(err, LedringError::NotFound(_)));
        assert!(err.to_string().contains("24"));
        assert!(svc.sets().is_empty());
    }

    #[test]
    fn spinning_wheel_non_positive_steps_does_nothing() {
        let svc = MockLightService::new(journal());
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());
        ctl.spinning_wheel(0, DELAY).unwrap();
        ctl.spinning_wheel(-1, DELAY).unwrap();
        assert!(svc.events().is_empty());
    }

    #[test]
    fn spinning_wheel_normalizes_service_colors() {
        let colors = ["#AABBCC"; 8];
        let svc = MockLightService::with_lights(journal(), ring_lights(&colors, &[true; 8]));
        let ctl = LedController::new(&svc, RecordingSleeper::new(), GroupLedSet::default());
        ctl.spinning_wheel(1, DELAY).unwrap();
        assert!(svc.sets().iter().all(|(_, c, _)| c == "#aabbcc"));
    }
}

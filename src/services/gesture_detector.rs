//! GestureDetector: ответственность и границы
//!
//! Детектор получает события указателя по одному, в порядке поступления, и
//! превращает их в абстрактные команды (`SwitchDesktop`, `ShowOverview`).
//! Он НЕ нажимает клавиши и НЕ обращается к ОС: команды уходят в канал,
//! а их исполнение - забота ShortcutDispatcher.
//!
//! Всё изменяемое состояние (два таймера) принадлежит экземпляру детектора и
//! меняется только через `&mut self`, поэтому блокировки не нужны.

use crate::config::{Config, TimestampPolicy};
use crate::events::{Command, Direction, Point, PointerAction, PointerEvent, ScrollDelta};
use crate::geometry::{hot_corner_region, MonitorSet, Rect};
use crate::{debug_if_enabled, trace_if_enabled};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorSettings {
    pub scroll_delay: Duration,
    pub repeat_delay: Option<Duration>,
    pub timestamp_policy: TimestampPolicy,
    /// `None` - горячий угол выключен
    pub hot_corner: Option<HotCornerSettings>,
    pub print_position: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotCornerSettings {
    pub region: Rect,
    pub delay: Duration,
}

impl DetectorSettings {
    /// `hot_corner_anchor` - левый верхний угол опорного монитора
    pub fn from_config(config: &Config, hot_corner_anchor: Point) -> Self {
        let hot_corner = config.hot_corner.enabled.then(|| HotCornerSettings {
            region: hot_corner_region(hot_corner_anchor, config.hot_corner.margin),
            delay: config.hot_corner_delay(),
        });

        Self {
            scroll_delay: config.scroll_delay(),
            repeat_delay: config.repeat_delay(),
            timestamp_policy: config.timing.timestamp_policy,
            hot_corner,
            print_position: config.print_position,
        }
    }
}

/// Таймеры прокрутки; меняются только обработчиком прокрутки.
/// `last_trigger_time` - задержка между любыми переключениями (и, по политике,
/// прокрутками вне зоны), `last_switch_time` - время последнего отданного
/// переключения, от него отсчитывается повтор.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceState {
    pub last_trigger_time: Option<Duration>,
    pub last_switch_time: Option<Duration>,
    pub last_direction: Option<Direction>,
}

/// Таймер горячего угла; меняется только обработчиком движения
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HotCornerState {
    pub last_trigger_time: Option<Duration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorState {
    pub scroll: DebounceState,
    pub hot_corner: HotCornerState,
}

/// Время с последнего срабатывания; `None`, если срабатываний ещё не было
fn elapsed_since(last: Option<Duration>, now: Duration) -> Option<Duration> {
    last.map(|last| now.saturating_sub(last))
}

pub struct GestureDetector {
    zones: MonitorSet,
    settings: DetectorSettings,
    state: DetectorState,
}

impl GestureDetector {
    pub fn new(zones: MonitorSet, settings: DetectorSettings) -> Self {
        info!(
            "Инициализация GestureDetector: {} зон, scroll_delay={}мс, repeat_delay={:?}, политика={:?}",
            zones.len(),
            settings.scroll_delay.as_millis(),
            settings.repeat_delay.map(|d| d.as_millis()),
            settings.timestamp_policy
        );
        if let Some(hot) = &settings.hot_corner {
            info!("Горячий угол: {} (задержка {}мс)", hot.region, hot.delay.as_millis());
        }

        Self {
            zones,
            settings,
            state: DetectorState::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn handle(&mut self, event: &PointerEvent) -> Option<Command> {
        match event.action {
            PointerAction::Move { position } => self.on_pointer_move(position, event.timestamp),
            PointerAction::Scroll { position, delta } => {
                self.on_pointer_scroll(position, delta, event.timestamp)
            }
        }
    }

    pub fn on_pointer_scroll(
        &mut self,
        position: Point,
        delta: ScrollDelta,
        now: Duration,
    ) -> Option<Command> {
        let elapsed = elapsed_since(self.state.scroll.last_trigger_time, now);

        if elapsed.is_some_and(|e| e < self.settings.scroll_delay) {
            trace_if_enabled!("Прокрутка в {} отброшена задержкой", position);
            return None;
        }

        if !self.zones.contains(position) {
            if self.settings.timestamp_policy == TimestampPolicy::Always {
                self.state.scroll.last_trigger_time = Some(now);
            }
            return None;
        }

        let direction = Direction::from_scroll(delta.dy);

        // Подавленный повтор не сдвигает таймеры: отсчёт идёт от последнего переключения
        if let Some(repeat_delay) = self.settings.repeat_delay {
            let same_direction = self.state.scroll.last_direction == Some(direction);
            let since_switch = elapsed_since(self.state.scroll.last_switch_time, now);
            if same_direction && since_switch.is_some_and(|e| e < repeat_delay) {
                debug_if_enabled!("Повтор {} в {} подавлен", direction, position);
                return None;
            }
        }

        self.state.scroll = DebounceState {
            last_trigger_time: Some(now),
            last_switch_time: Some(now),
            last_direction: Some(direction),
        };

        if self.settings.print_position {
            info!("Прокрутка: {} в {}", direction, position);
        }

        Some(Command::SwitchDesktop(direction))
    }

    pub fn on_pointer_move(&mut self, position: Point, now: Duration) -> Option<Command> {
        let hot = self.settings.hot_corner.as_ref()?;
        if !hot.region.contains(position) {
            return None;
        }

        let elapsed = elapsed_since(self.state.hot_corner.last_trigger_time, now);
        self.state.hot_corner.last_trigger_time = Some(now);

        if elapsed.is_some_and(|e| e < hot.delay) {
            trace_if_enabled!("Горячий угол ещё остывает");
            return None;
        }

        debug_if_enabled!("Курсор в горячем углу {}", position);
        Some(Command::ShowOverview)
    }

    /// Единственный владелец состояния: читает события из канала и отдаёт
    /// команды дальше. Возвращает число обработанных событий.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<PointerEvent>,
        commands: mpsc::Sender<Command>,
    ) -> u64 {
        info!("GestureDetector запущен");

        let mut handled = 0u64;
        while let Some(event) = events.recv().await {
            handled += 1;
            trace_if_enabled!("Событие указателя: {}", event);

            if let Some(command) = self.handle(&event) {
                if commands.send(command).await.is_err() {
                    warn!("Канал команд закрыт, останавливаем детектор");
                    break;
                }
            }
        }

        info!("GestureDetector остановлен после {} событий", handled);
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn settings(scroll_delay: u64, repeat_delay: Option<u64>) -> DetectorSettings {
        DetectorSettings {
            scroll_delay: ms(scroll_delay),
            repeat_delay: repeat_delay.map(ms),
            timestamp_policy: TimestampPolicy::Always,
            hot_corner: Some(HotCornerSettings {
                region: hot_corner_region(Point::new(0, 0), 1),
                delay: ms(500),
            }),
            print_position: false,
        }
    }

    /// Один монитор 1920x1080 в (0,0), полоса 30px
    fn detector(settings: DetectorSettings) -> GestureDetector {
        let zones = MonitorSet::new(vec![Rect::new(0, 0, 1920, 30)]).unwrap();
        GestureDetector::new(zones, settings)
    }

    const TOP: Point = Point::new(960, 10);
    const DOWN: ScrollDelta = ScrollDelta::vertical(-1);
    const UP: ScrollDelta = ScrollDelta::vertical(1);

    #[test]
    fn test_scroll_scenario_without_repeat_suppression() {
        let mut d = detector(settings(100, None));
        let right = Some(Command::SwitchDesktop(Direction::Right));

        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(0)), right);
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(50)), None);
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(150)), right);
    }

    #[test]
    fn test_scroll_scenario_with_repeat_suppression() {
        let mut d = detector(settings(100, Some(300)));

        assert_eq!(
            d.on_pointer_scroll(TOP, DOWN, ms(0)),
            Some(Command::SwitchDesktop(Direction::Right))
        );
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(50)), None);
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(150)), None);
        // Смена направления не подавляется
        assert_eq!(
            d.on_pointer_scroll(TOP, UP, ms(300)),
            Some(Command::SwitchDesktop(Direction::Left))
        );
    }

    #[test]
    fn test_suppressed_repeat_keeps_timers() {
        let mut d = detector(settings(100, Some(300)));
        d.on_pointer_scroll(TOP, DOWN, ms(0));
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(150)), None);
        assert_eq!(d.state().scroll.last_trigger_time, Some(ms(0)));
        assert_eq!(d.state().scroll.last_switch_time, Some(ms(0)));
        assert_eq!(d.state().scroll.last_direction, Some(Direction::Right));

        // 200мс с последнего переключения, направление сменилось
        assert_eq!(
            d.on_pointer_scroll(TOP, UP, ms(200)),
            Some(Command::SwitchDesktop(Direction::Left))
        );
    }

    #[test]
    fn test_continuous_scroll_repeats_every_repeat_delay() {
        let mut d = detector(settings(100, Some(300)));
        let emitted: Vec<u64> = (0..3000)
            .step_by(150)
            .filter(|t| d.on_pointer_scroll(TOP, DOWN, ms(*t)).is_some())
            .collect();

        assert_eq!(emitted, vec![0, 300, 600, 900, 1200, 1500, 1800, 2100, 2400, 2700]);
    }

    #[test]
    fn test_repeat_debounce_counts_match_reference_model() {
        let (scroll_delay, repeat_delay) = (100, 250);
        let mut d = detector(settings(scroll_delay, Some(repeat_delay)));

        let mut emitted = 0;
        let mut expected = 0;
        let mut last: Option<(u64, Direction)> = None;
        for t in (0..5000u64).step_by(37) {
            // Серии в одну сторону вперемешку со сменами направления
            let delta = if (t / 185) % 3 == 0 { UP } else { DOWN };
            let direction = Direction::from_scroll(delta.dy);

            if d.on_pointer_scroll(TOP, delta, ms(t)).is_some() {
                emitted += 1;
            }
            let fires = match last {
                None => true,
                Some((prev, prev_direction)) => {
                    let gap = t - prev;
                    gap >= scroll_delay && (prev_direction != direction || gap >= repeat_delay)
                }
            };
            if fires {
                expected += 1;
                last = Some((t, direction));
            }
        }

        assert!(expected > 10);
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_scroll_below_margin_never_emits() {
        let mut d = detector(settings(100, None));
        for t in [0, 50, 150, 1000, 5000] {
            assert_eq!(d.on_pointer_scroll(Point::new(960, 40), DOWN, ms(t)), None);
        }
    }

    #[test]
    fn test_first_scroll_is_armed() {
        let mut d = detector(settings(10_000, None));
        assert!(d.on_pointer_scroll(TOP, UP, ms(0)).is_some());
    }

    #[test]
    fn test_always_policy_updates_timer_outside_zone() {
        let mut d = detector(settings(100, None));
        assert_eq!(d.on_pointer_scroll(Point::new(960, 500), DOWN, ms(0)), None);
        assert_eq!(d.state().scroll.last_trigger_time, Some(ms(0)));
        // Внутри зоны, но слишком рано после события снаружи
        assert_eq!(d.on_pointer_scroll(TOP, DOWN, ms(50)), None);
        assert!(d.on_pointer_scroll(TOP, DOWN, ms(100)).is_some());
    }

    #[test]
    fn test_inside_only_policy_ignores_outside_events() {
        let mut s = settings(100, None);
        s.timestamp_policy = TimestampPolicy::InsideOnly;
        let mut d = detector(s);

        assert_eq!(d.on_pointer_scroll(Point::new(960, 500), DOWN, ms(0)), None);
        assert_eq!(d.state().scroll.last_trigger_time, None);
        assert!(d.on_pointer_scroll(TOP, DOWN, ms(50)).is_some());
    }

    #[test]
    fn test_debounce_counts_match_reference_model() {
        let scroll_delay = 100;
        let times = [0, 30, 99, 100, 160, 201, 260, 300, 450, 451, 560, 700, 705, 900];
        let mut d = detector(settings(scroll_delay, None));

        let mut emitted = 0;
        let mut expected = 0;
        let mut last_emitted: Option<u64> = None;
        for (i, t) in times.iter().enumerate() {
            let delta = if i % 2 == 0 { DOWN } else { UP };
            if d.on_pointer_scroll(TOP, delta, ms(*t)).is_some() {
                emitted += 1;
            }
            if last_emitted.map_or(true, |last| t - last >= scroll_delay) {
                expected += 1;
                last_emitted = Some(*t);
            }
        }

        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_emissions_never_closer_than_scroll_delay() {
        let mut d = detector(settings(100, Some(250)));
        let mut last: Option<(u64, Direction)> = None;

        for t in (0..3000).step_by(17) {
            let delta = if (t / 170) % 3 == 0 { UP } else { DOWN };
            if let Some(Command::SwitchDesktop(direction)) = d.on_pointer_scroll(TOP, delta, ms(t)) {
                if let Some((prev, prev_direction)) = last {
                    assert!(t - prev >= 100);
                    if prev_direction == direction {
                        assert!(t - prev >= 250);
                    }
                }
                last = Some((t, direction));
            }
        }

        assert!(last.is_some());
    }

    #[test]
    fn test_multi_monitor_zones_with_negative_coordinates() {
        let zones = MonitorSet::new(vec![
            Rect::new(-2560, -360, 0, -330),
            Rect::new(0, 0, 1920, 30),
        ])
        .unwrap();
        let mut d = GestureDetector::new(zones, settings(100, None));

        assert!(d.on_pointer_scroll(Point::new(-1000, -350), DOWN, ms(0)).is_some());
        assert!(d.on_pointer_scroll(Point::new(-1000, 10), DOWN, ms(200)).is_none());
    }

    #[test]
    fn test_hot_corner_scenario() {
        let mut d = detector(settings(100, None));
        assert_eq!(d.on_pointer_move(Point::new(0, 0), ms(0)), Some(Command::ShowOverview));

        let mut d = detector(settings(100, None));
        assert_eq!(d.on_pointer_move(Point::new(2, 2), ms(0)), None);
        assert_eq!(d.state().hot_corner.last_trigger_time, None);
    }

    #[test]
    fn test_hot_corner_rapid_reentry_emits_once() {
        let mut d = detector(settings(100, None));
        assert_eq!(d.on_pointer_move(Point::new(0, 0), ms(0)), Some(Command::ShowOverview));
        assert_eq!(d.on_pointer_move(Point::new(400, 400), ms(100)), None);
        assert_eq!(d.on_pointer_move(Point::new(1, 1), ms(300)), None);
        // Таймер обновился в 300мс, поэтому 700мс ещё в окне остывания
        assert_eq!(d.on_pointer_move(Point::new(1, 0), ms(700)), None);
        assert_eq!(d.on_pointer_move(Point::new(0, 1), ms(1300)), Some(Command::ShowOverview));
    }

    #[test]
    fn test_hot_corner_disabled() {
        let mut s = settings(100, None);
        s.hot_corner = None;
        let mut d = detector(s);
        assert_eq!(d.on_pointer_move(Point::new(0, 0), ms(0)), None);
    }

    #[test]
    fn test_timers_are_independent() {
        let mut d = detector(settings(100, None));
        assert!(d.on_pointer_move(Point::new(0, 0), ms(0)).is_some());
        assert!(d.on_pointer_scroll(Point::new(0, 0), DOWN, ms(1)).is_some());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.timing.scroll_delay_ms = 150;
        config.timing.repeat_delay_ms = Some(400);
        config.hot_corner.margin = 5;

        let s = DetectorSettings::from_config(&config, Point::new(-1920, 0));
        assert_eq!(s.scroll_delay, ms(150));
        assert_eq!(s.repeat_delay, Some(ms(400)));
        assert_eq!(s.hot_corner.unwrap().region, Rect::new(-1920, 0, -1915, 5));

        config.hot_corner.enabled = false;
        assert!(DetectorSettings::from_config(&config, Point::new(0, 0)).hot_corner.is_none());
    }

    #[tokio::test]
    async fn test_run_forwards_commands_in_order() {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (command_tx, mut command_rx) = mpsc::channel(16);
        let d = detector(settings(100, None));

        event_tx.send(PointerEvent::moved(Point::new(0, 0), ms(0))).await.unwrap();
        event_tx.send(PointerEvent::scrolled(TOP, UP, ms(10))).await.unwrap();
        event_tx.send(PointerEvent::scrolled(TOP, DOWN, ms(20))).await.unwrap();
        event_tx.send(PointerEvent::scrolled(TOP, DOWN, ms(200))).await.unwrap();
        drop(event_tx);

        let handled = d.run(event_rx, command_tx).await;
        assert_eq!(handled, 4);

        let mut commands = Vec::new();
        while let Some(command) = command_rx.recv().await {
            commands.push(command);
        }
        assert_eq!(
            commands,
            vec![
                Command::ShowOverview,
                Command::SwitchDesktop(Direction::Left),
                Command::SwitchDesktop(Direction::Right),
            ]
        );
    }
}

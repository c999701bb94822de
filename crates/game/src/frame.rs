use bevy::prelude::*;
use utils::math::format_clock;

use crate::character::player::PlayerDied;

/// Survival time. Stops advancing once the player is dead.
#[derive(Resource, Default, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Resource)]
pub struct GameTimer {
    pub elapsed: f32,
    pub game_over: bool,
}

impl GameTimer {
    pub fn clock(&self) -> String {
        format_clock(self.elapsed)
    }
}

pub fn advance_game_timer(
    time: Res<Time>,
    mut died: EventReader<PlayerDied>,
    mut timer: ResMut<GameTimer>,
) {
    if died.read().count() > 0 && !timer.game_over {
        timer.game_over = true;
        info!("Game over, survived {}", timer.clock());
    }
    if !timer.game_over {
        timer.elapsed += time.delta_secs();
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimePlugin;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins.build().disable::<TimePlugin>());
        app.insert_resource(Time::<()>::default());
        app.init_resource::<GameTimer>();
        app.add_event::<PlayerDied>();
        app.add_systems(Update, advance_game_timer);
        app
    }

    fn step(app: &mut App, secs: f32) {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    #[test]
    fn timer_freezes_on_player_death() {
        let mut app = app();
        step(&mut app, 1.0);
        step(&mut app, 1.0);
        let before = app.world().resource::<GameTimer>().elapsed;
        assert!((before - 2.0).abs() < 1e-4);

        let player = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(PlayerDied { entity: player, at: 2.0 });
        step(&mut app, 1.0);
        step(&mut app, 5.0);

        let timer = *app.world().resource::<GameTimer>();
        assert!(timer.game_over);
        assert_eq!(timer.elapsed, before);
        assert_eq!(timer.clock(), "00:02");
    }
}

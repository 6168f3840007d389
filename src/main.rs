//! Controller Demo
//!
//! Scripted run of the platformer controller: walk toward a ledge, drop
//! off it, coyote-jump, then a buffered jump pressed mid-fall, then an
//! attack. Logs every controller event.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use platformer_controller::{
    AabbWorld, Body2d, Controller, ControllerConfig, ControllerEvent, GroundFilter, InputEvent,
    InputHub, PhysicsBody, Vec2, PHYSICS_STEP_SECONDS, PHYSICS_TICK_RATE, VERSION,
};

fn main() {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Platformer Controller v{}", VERSION);
    info!("Physics step: {} Hz", PHYSICS_TICK_RATE);

    demo_run();
}

/// Demo scene: an upper floor ending at x = 0 and a lower floor two units
/// below it.
fn build_world() -> AabbWorld {
    let mut world = AabbWorld::new();
    world.add_box(Vec2::new(-5.0, -0.5), Vec2::new(5.0, 0.5), GroundFilter::GROUND);
    world.add_box(Vec2::new(10.0, -2.5), Vec2::new(10.0, 0.5), GroundFilter::GROUND);
    world
}

fn demo_run() {
    let hub = Rc::new(RefCell::new(InputHub::new()));
    let body = Rc::new(RefCell::new(Body2d::new(Vec2::new(-3.0, 0.5), 30.0)));

    let config = ControllerConfig::default();
    info!(
        "Tunables: move_speed={} jump_force={} coyote={}s buffer={}s",
        config.move_speed, config.jump_force, config.coyote_time, config.jump_buffer_time
    );

    let controller = Rc::new(RefCell::new(
        Controller::new(config, body.clone(), Rc::new(build_world()))
            .expect("demo config is valid"),
    ));
    Controller::enable(&controller, &hub);

    // Walk right the whole run.
    hub.borrow_mut().set_move_axis(1.0);

    let mut jump_pressed_in_fall = false;
    let mut attack_done = false;

    for tick in 0u32..(PHYSICS_TICK_RATE * 5) {
        let t = tick as f32 * PHYSICS_STEP_SECONDS;

        controller.borrow_mut().frame_update(PHYSICS_STEP_SECONDS);
        controller.borrow_mut().physics_step();

        for event in controller.borrow_mut().take_events() {
            match event {
                ControllerEvent::JumpExecuted { buffered } => {
                    info!("t={:.3}s jump executed (buffered: {})", t, buffered);
                }
                ControllerEvent::JumpCut { scaled_velocity } => {
                    info!("t={:.3}s jump cut, vy now {:.2}", t, scaled_velocity);
                }
                ControllerEvent::AttackRequested => {
                    info!("t={:.3}s attack requested", t);
                }
                ControllerEvent::AttackStruck { origin } => {
                    info!("t={:.3}s attack struck at {:?}", t, origin);
                }
            }
        }

        // Integrate and resolve support (feet at y - 0.5): upper floor
        // while over it, lower floor after the drop.
        {
            let mut b = body.borrow_mut();
            b.step(PHYSICS_STEP_SECONDS);
            let pos = b.position();
            if pos.x <= 0.4 && pos.y <= 0.5 && b.velocity().y < 0.0 {
                b.land_at(0.5);
            } else if pos.x >= 0.0 && pos.y <= -1.5 && b.velocity().y < 0.0 {
                b.land_at(-1.5);
            }
        }

        // Script: press jump late in the fall off the ledge so the press
        // lands in the buffer window, release shortly after the ascent
        // starts, then attack once back on the ground.
        let (pos, vy) = {
            let b = body.borrow();
            (b.position(), b.velocity().y)
        };

        if !jump_pressed_in_fall && !controller.borrow().is_grounded() && pos.y < -1.0 && vy < 0.0
        {
            info!("t={:.3}s falling at y={:.2}, pressing jump early", t, pos.y);
            hub.borrow_mut().publish(InputEvent::JumpPressed);
            jump_pressed_in_fall = true;
        }

        if controller.borrow().is_jumping() && vy > 10.0 && hub.borrow().jump_held() {
            hub.borrow_mut().publish(InputEvent::JumpReleased);
        }

        if jump_pressed_in_fall
            && !attack_done
            && controller.borrow().is_grounded()
            && !controller.borrow().is_jumping()
        {
            hub.borrow_mut().publish(InputEvent::AttackPressed);
            // The animation relay would call back at the hit frame; the
            // demo stands in for it directly.
            controller.borrow_mut().execute_attack();
            attack_done = true;
        }
    }

    let final_pos = body.borrow().position();
    info!("Demo finished at position {:?}", final_pos);
    controller.borrow_mut().disable();
}

//! The player character and its typestate machine.
//!
//! Each state is a `RedHatBoyState<S>` where the zero-sized marker `S` says
//! which transitions exist; the compiler rejects, say, sliding out of a jump.
//! `RedHatBoyStateMachine` erases the marker so the game can hold "some state"
//! and feed it [`Event`]s. Pairs with no transition leave the state as is.

use tracing::debug;

use self::red_hat_boy_states::*;
use crate::error::EngineResult;
use crate::geometry::Rect;
use crate::render::{ImageHandle, Renderer};
use crate::sheet::{Cell, Sheet};

/// Coarse state, for callers that only need to know where the player is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Sliding,
    Jumping,
    Falling,
    KnockedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Run,
    Slide,
    Jump,
    Update,
    KnockOut,
    /// Land on a surface whose top edge is at this `y`.
    Land(i16),
}

/// Animation names and their frame counts, as laid out in `rhb.json`.
const ANIMATIONS: [(&str, u8); 5] = [
    (IDLE_FRAME_NAME, IDLE_FRAMES),
    (RUN_FRAME_NAME, RUNNING_FRAMES),
    (SLIDING_FRAME_NAME, SLIDING_FRAMES),
    (JUMPING_FRAME_NAME, JUMPING_FRAMES),
    (FALLING_FRAME_NAME, FALLING_FRAMES),
];

fn sprite_name(animation: &str, frame: u8) -> String {
    // Each sprite is held for three updates.
    format!("{} ({}).png", animation, (frame / 3) + 1)
}

pub struct RedHatBoy<I> {
    state_machine: RedHatBoyStateMachine,
    sprite_sheet: Sheet,
    image: I,
}

impl<I: ImageHandle> RedHatBoy<I> {
    /// Fails with `MissingCell` if the sheet lacks any animation frame, so
    /// drawing never has to deal with a missing sprite.
    pub fn new(sprite_sheet: Sheet, image: I) -> EngineResult<Self> {
        validate_sheet(&sprite_sheet)?;
        Ok(Self {
            state_machine: RedHatBoyStateMachine::Idle(RedHatBoyState::new()),
            sprite_sheet,
            image,
        })
    }

    fn transition(&mut self, event: Event) {
        let before = self.state_machine.kind();
        self.state_machine = self.state_machine.transition(event);
        let after = self.state_machine.kind();
        if before != after {
            debug!(?before, ?after, ?event, "red hat boy transition");
        }
    }

    pub fn run_right(&mut self) {
        self.transition(Event::Run);
    }

    pub fn slide(&mut self) {
        self.transition(Event::Slide);
    }

    pub fn jump(&mut self) {
        self.transition(Event::Jump);
    }

    pub fn update(&mut self) {
        self.transition(Event::Update);
    }

    pub fn knock_out(&mut self) {
        self.transition(Event::KnockOut);
    }

    pub fn land_on(&mut self, position: i16) {
        self.transition(Event::Land(position));
    }

    pub fn state(&self) -> PlayerState {
        self.state_machine.kind()
    }

    pub fn pos_x(&self) -> i16 {
        self.state_machine.context().position.x
    }

    pub fn pos_y(&self) -> i16 {
        self.state_machine.context().position.y
    }

    pub fn velocity_y(&self) -> i16 {
        self.state_machine.context().velocity.y
    }

    pub fn walking_speed(&self) -> i16 {
        self.state_machine.context().velocity.x
    }

    pub fn frame_name(&self) -> String {
        sprite_name(
            self.state_machine.frame_name(),
            self.state_machine.context().frame,
        )
    }

    fn current_sprite(&self) -> Option<&Cell> {
        self.sprite_sheet.cell(&self.frame_name())
    }

    /// Where the current sprite lands on the canvas.
    pub fn destination_box(&self) -> Rect {
        let position = self.state_machine.context().position;
        match self.current_sprite() {
            Some(sprite) => Rect::new_from_x_y(
                position.x.saturating_add(sprite.sprite_source_size.x),
                position.y.saturating_add(sprite.sprite_source_size.y),
                sprite.frame.w,
                sprite.frame.h,
            ),
            None => Rect::new(position, 0, 0),
        }
    }

    /// Collision box: the destination box trimmed to the visible body.
    pub fn bounding_box(&self) -> Rect {
        const X_OFFSET: i16 = 56;
        const Y_OFFSET: i16 = 14;
        const WIDTH_OFFSET: i16 = 82;
        let destination_box = self.destination_box();

        Rect::new_from_x_y(
            destination_box.x().saturating_add(X_OFFSET),
            destination_box.y().saturating_add(Y_OFFSET),
            (destination_box.width - WIDTH_OFFSET).max(0),
            (destination_box.height - Y_OFFSET).max(0),
        )
    }

    pub fn draw<R: Renderer<Image = I>>(&self, renderer: &R) {
        let Some(sprite) = self.current_sprite() else {
            return;
        };

        renderer.draw_image(
            &self.image,
            &Rect::new_from_x_y(
                sprite.frame.x,
                sprite.frame.y,
                sprite.frame.w,
                sprite.frame.h,
            ),
            &self.destination_box(),
        );
        renderer.draw_bounding_box(&self.bounding_box());
    }
}

#[derive(Debug, Clone, Copy)]
enum RedHatBoyStateMachine {
    Idle(RedHatBoyState<Idle>),
    Running(RedHatBoyState<Running>),
    Sliding(RedHatBoyState<Sliding>),
    Jumping(RedHatBoyState<Jumping>),
    Falling(RedHatBoyState<Falling>),
    KnockedOut(RedHatBoyState<KnockedOut>),
}

impl RedHatBoyStateMachine {
    fn transition(self, event: Event) -> Self {
        use RedHatBoyStateMachine as M;
        match (self, event) {
            (M::Idle(state), Event::Run) => state.run().into(),
            (M::Idle(state), Event::Update) => state.update().into(),
            (M::Running(state), Event::Slide) => state.slide().into(),
            (M::Running(state), Event::Jump) => state.jump().into(),
            (M::Running(state), Event::Update) => state.update().into(),
            (M::Running(state), Event::KnockOut) => state.knock_out().into(),
            (M::Running(state), Event::Land(position)) => state.land_on(position).into(),
            (M::Sliding(state), Event::Update) => state.update().into(),
            (M::Sliding(state), Event::KnockOut) => state.knock_out().into(),
            (M::Sliding(state), Event::Land(position)) => state.land_on(position).into(),
            (M::Jumping(state), Event::Update) => state.update().into(),
            (M::Jumping(state), Event::KnockOut) => state.knock_out().into(),
            (M::Jumping(state), Event::Land(position)) => state.land_on(position).into(),
            (M::Falling(state), Event::Update) => state.update().into(),
            _ => self,
        }
    }

    fn kind(&self) -> PlayerState {
        match self {
            RedHatBoyStateMachine::Idle(_) => PlayerState::Idle,
            RedHatBoyStateMachine::Running(_) => PlayerState::Running,
            RedHatBoyStateMachine::Sliding(_) => PlayerState::Sliding,
            RedHatBoyStateMachine::Jumping(_) => PlayerState::Jumping,
            RedHatBoyStateMachine::Falling(_) => PlayerState::Falling,
            RedHatBoyStateMachine::KnockedOut(_) => PlayerState::KnockedOut,
        }
    }

    fn frame_name(&self) -> &'static str {
        match self {
            RedHatBoyStateMachine::Idle(state) => state.frame_name(),
            RedHatBoyStateMachine::Running(state) => state.frame_name(),
            RedHatBoyStateMachine::Sliding(state) => state.frame_name(),
            RedHatBoyStateMachine::Jumping(state) => state.frame_name(),
            RedHatBoyStateMachine::Falling(state) => state.frame_name(),
            RedHatBoyStateMachine::KnockedOut(state) => state.frame_name(),
        }
    }

    fn context(&self) -> &RedHatBoyContext {
        match self {
            RedHatBoyStateMachine::Idle(state) => state.context(),
            RedHatBoyStateMachine::Running(state) => state.context(),
            RedHatBoyStateMachine::Sliding(state) => state.context(),
            RedHatBoyStateMachine::Jumping(state) => state.context(),
            RedHatBoyStateMachine::Falling(state) => state.context(),
            RedHatBoyStateMachine::KnockedOut(state) => state.context(),
        }
    }
}

impl From<RedHatBoyState<Idle>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<Idle>) -> Self {
        RedHatBoyStateMachine::Idle(state)
    }
}

impl From<RedHatBoyState<Running>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<Running>) -> Self {
        RedHatBoyStateMachine::Running(state)
    }
}

impl From<RedHatBoyState<Sliding>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<Sliding>) -> Self {
        RedHatBoyStateMachine::Sliding(state)
    }
}

impl From<RedHatBoyState<Jumping>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<Jumping>) -> Self {
        RedHatBoyStateMachine::Jumping(state)
    }
}

impl From<RedHatBoyState<Falling>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<Falling>) -> Self {
        RedHatBoyStateMachine::Falling(state)
    }
}

impl From<RedHatBoyState<KnockedOut>> for RedHatBoyStateMachine {
    fn from(state: RedHatBoyState<KnockedOut>) -> Self {
        RedHatBoyStateMachine::KnockedOut(state)
    }
}

impl From<SlidingEndState> for RedHatBoyStateMachine {
    fn from(state: SlidingEndState) -> Self {
        match state {
            SlidingEndState::Sliding(sliding) => sliding.into(),
            SlidingEndState::Running(running) => running.into(),
        }
    }
}

impl From<JumpingEndState> for RedHatBoyStateMachine {
    fn from(state: JumpingEndState) -> Self {
        match state {
            JumpingEndState::Jumping(jumping) => jumping.into(),
            JumpingEndState::Landing(landing) => landing.into(),
        }
    }
}

impl From<FallingEndState> for RedHatBoyStateMachine {
    fn from(state: FallingEndState) -> Self {
        match state {
            FallingEndState::Falling(falling) => falling.into(),
            FallingEndState::KnockedOut(knocked_out) => knocked_out.into(),
        }
    }
}

mod red_hat_boy_states {
    use crate::geometry::Point;
    use crate::HEIGHT;

    pub(super) const FLOOR: i16 = 479;
    pub(super) const PLAYER_HEIGHT: i16 = HEIGHT - FLOOR;
    pub(super) const STARTING_POINT: i16 = -20;
    pub(super) const IDLE_FRAMES: u8 = 29;
    pub(super) const RUNNING_FRAMES: u8 = 23;
    pub(super) const JUMPING_FRAMES: u8 = 35;
    pub(super) const SLIDING_FRAMES: u8 = 14;
    pub(super) const FALLING_FRAMES: u8 = 29;
    pub(super) const RUNNING_SPEED: i16 = 4;
    pub(super) const IDLE_FRAME_NAME: &str = "Idle";
    pub(super) const RUN_FRAME_NAME: &str = "Run";
    pub(super) const SLIDING_FRAME_NAME: &str = "Slide";
    pub(super) const JUMPING_FRAME_NAME: &str = "Jump";
    pub(super) const FALLING_FRAME_NAME: &str = "Dead";
    pub(super) const JUMP_SPEED: i16 = -25;
    pub(super) const GRAVITY: i16 = 1;
    pub(super) const TERMINAL_VELOCITY: i16 = 20;

    #[derive(Debug, Clone, Copy)]
    pub struct RedHatBoyState<S> {
        context: RedHatBoyContext,
        _state: S,
    }

    impl<S> RedHatBoyState<S> {
        pub fn context(&self) -> &RedHatBoyContext {
            &self.context
        }

        fn update_context(&mut self, frames: u8) {
            self.context = self.context.update(frames);
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Idle;

    impl RedHatBoyState<Idle> {
        pub fn new() -> Self {
            RedHatBoyState {
                context: RedHatBoyContext {
                    frame: 0,
                    position: Point {
                        x: STARTING_POINT,
                        y: FLOOR,
                    },
                    velocity: Point { x: 0, y: 0 },
                },
                _state: Idle,
            }
        }

        pub fn frame_name(&self) -> &'static str {
            IDLE_FRAME_NAME
        }

        pub fn run(self) -> RedHatBoyState<Running> {
            RedHatBoyState {
                context: self.context.reset_frame().run_right(),
                _state: Running,
            }
        }

        pub fn update(mut self) -> RedHatBoyState<Idle> {
            self.update_context(IDLE_FRAMES);
            self
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Running;

    impl RedHatBoyState<Running> {
        pub fn frame_name(&self) -> &'static str {
            RUN_FRAME_NAME
        }

        pub fn update(mut self) -> RedHatBoyState<Running> {
            self.update_context(RUNNING_FRAMES);
            self
        }

        pub fn slide(self) -> RedHatBoyState<Sliding> {
            RedHatBoyState {
                context: self.context.reset_frame(),
                _state: Sliding,
            }
        }

        pub fn jump(self) -> RedHatBoyState<Jumping> {
            RedHatBoyState {
                context: self.context.reset_frame().set_vertical_velocity(JUMP_SPEED),
                _state: Jumping,
            }
        }

        pub fn knock_out(self) -> RedHatBoyState<Falling> {
            RedHatBoyState {
                context: self.context.reset_frame().stop(),
                _state: Falling,
            }
        }

        pub fn land_on(self, position: i16) -> RedHatBoyState<Running> {
            RedHatBoyState {
                context: self.context.set_on(position),
                _state: Running,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Sliding;

    pub enum SlidingEndState {
        Sliding(RedHatBoyState<Sliding>),
        Running(RedHatBoyState<Running>),
    }

    impl RedHatBoyState<Sliding> {
        pub fn frame_name(&self) -> &'static str {
            SLIDING_FRAME_NAME
        }

        pub fn update(mut self) -> SlidingEndState {
            self.update_context(SLIDING_FRAMES);

            if self.context.frame >= SLIDING_FRAMES {
                SlidingEndState::Running(self.stand())
            } else {
                SlidingEndState::Sliding(self)
            }
        }

        pub fn stand(self) -> RedHatBoyState<Running> {
            RedHatBoyState {
                context: self.context.reset_frame(),
                _state: Running,
            }
        }

        pub fn knock_out(self) -> RedHatBoyState<Falling> {
            RedHatBoyState {
                context: self.context.reset_frame().stop(),
                _state: Falling,
            }
        }

        pub fn land_on(self, position: i16) -> RedHatBoyState<Running> {
            RedHatBoyState {
                context: self.context.set_on(position),
                _state: Running,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Jumping;

    pub enum JumpingEndState {
        Jumping(RedHatBoyState<Jumping>),
        Landing(RedHatBoyState<Running>),
    }

    impl RedHatBoyState<Jumping> {
        pub fn frame_name(&self) -> &'static str {
            JUMPING_FRAME_NAME
        }

        pub fn update(mut self) -> JumpingEndState {
            self.update_context(JUMPING_FRAMES);

            if self.context.position.y >= FLOOR {
                JumpingEndState::Landing(self.land_on(HEIGHT))
            } else {
                JumpingEndState::Jumping(self)
            }
        }

        pub fn land_on(self, position: i16) -> RedHatBoyState<Running> {
            RedHatBoyState {
                context: self.context.reset_frame().set_on(position),
                _state: Running,
            }
        }

        pub fn knock_out(self) -> RedHatBoyState<Falling> {
            RedHatBoyState {
                context: self.context.reset_frame().stop(),
                _state: Falling,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Falling;

    pub enum FallingEndState {
        Falling(RedHatBoyState<Falling>),
        KnockedOut(RedHatBoyState<KnockedOut>),
    }

    impl RedHatBoyState<Falling> {
        pub fn frame_name(&self) -> &'static str {
            FALLING_FRAME_NAME
        }

        pub fn update(mut self) -> FallingEndState {
            self.update_context(FALLING_FRAMES);

            if self.context.frame >= FALLING_FRAMES {
                FallingEndState::KnockedOut(self.knock_out())
            } else {
                FallingEndState::Falling(self)
            }
        }

        pub fn knock_out(self) -> RedHatBoyState<KnockedOut> {
            RedHatBoyState {
                context: self.context,
                _state: KnockedOut,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct KnockedOut;

    impl RedHatBoyState<KnockedOut> {
        pub fn frame_name(&self) -> &'static str {
            FALLING_FRAME_NAME
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct RedHatBoyContext {
        pub frame: u8,
        pub position: Point,
        pub velocity: Point,
    }

    impl RedHatBoyContext {
        pub fn update(mut self, frame_count: u8) -> Self {
            if self.velocity.y < TERMINAL_VELOCITY {
                self.velocity.y += GRAVITY;
            }

            if self.frame < frame_count {
                self.frame += 1;
            } else {
                self.frame = 0;
            }

            // The level has no right edge; x pins at i16::MAX.
            self.position.x = self.position.x.saturating_add(self.velocity.x);
            self.position.y = self.position.y.saturating_add(self.velocity.y);

            if self.position.y > FLOOR {
                self.position.y = FLOOR;
            }

            self
        }

        fn reset_frame(mut self) -> Self {
            self.frame = 0;
            self
        }

        fn set_vertical_velocity(mut self, y: i16) -> Self {
            self.velocity.y = y;
            self
        }

        fn run_right(mut self) -> Self {
            self.velocity.x += RUNNING_SPEED;
            self
        }

        fn stop(mut self) -> Self {
            self.velocity.x = 0;
            self.velocity.y = 0;
            self
        }

        fn set_on(mut self, position: i16) -> Self {
            self.position.y = position.saturating_sub(PLAYER_HEIGHT);
            self
        }
    }
}

/// Build an `rhb.json`-shaped sheet where every animation frame is a
/// `w`×`h` cell at the origin. Used by tests and headless runs.
pub fn uniform_sheet(w: i16, h: i16) -> Sheet {
    use crate::sheet::SheetRect;

    let mut sheet = Sheet::default();
    for (animation, frames) in ANIMATIONS {
        for frame in (0..=frames).step_by(3) {
            sheet.frames.insert(
                sprite_name(animation, frame),
                Cell {
                    frame: SheetRect { x: 0, y: 0, w, h },
                    sprite_source_size: SheetRect::default(),
                },
            );
        }
    }
    sheet
}

/// Check that `sheet` holds every frame the player animates through.
pub fn validate_sheet(sheet: &Sheet) -> EngineResult<()> {
    for (animation, frames) in ANIMATIONS {
        for frame in (0..=frames).step_by(3) {
            sheet.require(&sprite_name(animation, frame))?;
        }
    }
    Ok(())
}

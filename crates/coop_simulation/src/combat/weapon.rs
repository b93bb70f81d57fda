//! Weapon state machine: Idle / Firing / Reloading
//!
//! Владеет ammo, fire-rate pacing и reload таймерами. Время приходит снаружи
//! (`now`, секунды frame clock), таймеры: данные в `Scheduler<WeaponTimer>`,
//! исполняются внутри `advance(now, owner)`.
//!
//! Authority vs Replica:
//! - Authority тратит ammo, двигает reload, его выстрелы наносят урон
//! - Replica форвардит запросы (`WeaponEvent::Forward`), стреляет только
//!   predicted выстрелами (эффекты), ammo/reload меняет только snapshot
//!
//! Наружу weapon общается через очередь `WeaponEvent` (`drain_events`).

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::ammo::Ammo;
use crate::combat::damage::damage_for_surface;
use crate::combat::hitscan::{cone_spread, HitScanTrace, HitScanTracer, TraceHit};
use crate::combat::replication::WeaponSnapshot;
use crate::components::{Aim, NetRole};
use crate::config::{WeaponConfig, MAX_RATE_OF_FIRE};
use crate::scheduler::{Scheduler, TimerHandle};

/// ReloadWeapon срабатывает за столько секунд до конца анимации
pub const RELOAD_REFILL_LEAD: f32 = 0.1;

/// Нижняя граница reload (и задержки refill)
pub const MIN_RELOAD_DURATION: f32 = 0.1;

/// Самый короткий период fire tick (для конфигов в обход `validate`)
pub const MIN_TIME_BETWEEN_SHOTS: f32 = 60.0 / MAX_RATE_OF_FIRE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Idle,
    Firing,
    Reloading,
}

/// Timer callbacks (data, dispatched by `Weapon::advance`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponTimer {
    HandleFiring,
    ReloadWeapon,
    StopReload,
}

/// Player/AI input (и то, что replica форвардит authority)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponRequest {
    StartFire,
    StopFire,
    StartReload,
    StopReload,
}

/// Pawn gates, sampled by the ECS layer each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerState {
    pub alive: bool,
    pub can_reload: bool,
    /// Reload animation duration; `None` → `no_anim_reload_duration`
    pub reload_animation: Option<f32>,
}

impl Default for OwnerState {
    fn default() -> Self {
        Self {
            alive: true,
            can_reload: true,
            reload_animation: None,
        }
    }
}

/// Outgoing notifications (drained by the ECS layer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponEvent {
    /// Fire tick accepted a shot; resolve it with `Weapon::fire`
    ShotRequested { predicted: bool },
    /// Replica → authority request
    Forward(WeaponRequest),
    StateChanged { from: WeaponState, to: WeaponState },
    ReloadStarted { duration: f32 },
    ReloadStopped,
    ClipReloaded { rounds: u32, in_clip: u32, reserve: u32 },
    /// Replica получил новый authority trace
    TraceReplicated(HitScanTrace),
}

/// Resolved shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOutcome {
    pub trace: HitScanTrace,
    pub hit: Option<TraceHit>,
    /// 0 при промахе
    pub damage: f32,
    pub predicted: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Weapon {
    config: WeaponConfig,
    role: NetRole,
    state: WeaponState,
    ammo: Ammo,
    wants_to_fire: bool,
    pending_reload: bool,
    /// Последний pending_reload из authority snapshot (только replica)
    replicated_pending_reload: bool,
    /// Replica уже отправила StartReload и ждёт ответа authority
    reload_requested: bool,
    last_fire_time: Option<f32>,
    time_between_shots: f32,
    timers: Scheduler<WeaponTimer>,
    fire_timer: Option<TimerHandle>,
    reload_weapon_timer: Option<TimerHandle>,
    stop_reload_timer: Option<TimerHandle>,
    last_trace: HitScanTrace,
    events: Vec<WeaponEvent>,
}

impl Weapon {
    pub fn new(config: WeaponConfig, role: NetRole) -> Self {
        Self {
            ammo: Ammo::initial(&config),
            time_between_shots: config.time_between_shots().max(MIN_TIME_BETWEEN_SHOTS),
            config,
            role,
            state: WeaponState::Idle,
            wants_to_fire: false,
            pending_reload: false,
            replicated_pending_reload: false,
            reload_requested: false,
            last_fire_time: None,
            timers: Scheduler::new(),
            fire_timer: None,
            reload_weapon_timer: None,
            stop_reload_timer: None,
            last_trace: HitScanTrace::default(),
            events: Vec::new(),
        }
    }

    pub fn authority(config: WeaponConfig) -> Self {
        Self::new(config, NetRole::Authority)
    }

    pub fn replica(config: WeaponConfig) -> Self {
        Self::new(config, NetRole::Replica)
    }

    // ===== Read API (одинаковый для authority и replica) =====

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn ammo(&self) -> Ammo {
        self.ammo
    }

    pub fn ammo_in_clip(&self) -> u32 {
        self.ammo.in_clip()
    }

    pub fn ammo_reserve(&self) -> u32 {
        self.ammo.reserve()
    }

    pub fn wants_to_fire(&self) -> bool {
        self.wants_to_fire
    }

    pub fn pending_reload(&self) -> bool {
        self.pending_reload
    }

    pub fn last_fire_time(&self) -> Option<f32> {
        self.last_fire_time
    }

    pub fn time_between_shots(&self) -> f32 {
        self.time_between_shots
    }

    pub fn last_trace(&self) -> &HitScanTrace {
        &self.last_trace
    }

    pub fn is_fire_tick_scheduled(&self) -> bool {
        self.fire_timer.is_some_and(|handle| self.timers.is_active(handle))
    }

    pub fn scheduled_timers(&self) -> usize {
        self.timers.len()
    }

    /// Next timer due time (для host loop, который хочет спать до него)
    pub fn next_timer_due(&self) -> Option<f32> {
        self.timers.next_due()
    }

    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Gates =====

    /// Owner alive, state Idle/Firing, no pending reload.
    pub fn can_fire(&self, owner: &OwnerState) -> bool {
        owner.alive
            && matches!(self.state, WeaponState::Idle | WeaponState::Firing)
            && !self.pending_reload
    }

    /// Owner permits, clip not full, reserve (or infinite ammo), state Idle/Firing.
    pub fn can_reload(&self, owner: &OwnerState) -> bool {
        owner.can_reload
            && self.ammo.can_reload(&self.config)
            && matches!(self.state, WeaponState::Idle | WeaponState::Firing)
    }

    // ===== Input =====

    pub fn request(&mut self, request: WeaponRequest, now: f32, owner: &OwnerState) {
        match request {
            WeaponRequest::StartFire => self.start_fire(now, owner),
            WeaponRequest::StopFire => self.stop_fire(now, owner),
            WeaponRequest::StartReload => self.start_reload(now, owner),
            WeaponRequest::StopReload => self.stop_reload(now, owner),
        }
    }

    pub fn start_fire(&mut self, now: f32, owner: &OwnerState) {
        if self.wants_to_fire {
            return;
        }

        if self.role.is_replica() {
            self.events.push(WeaponEvent::Forward(WeaponRequest::StartFire));
        }

        self.wants_to_fire = true;
        self.determine_state(now, owner);
    }

    /// Idempotent: повторный вызов не меняет state и таймеры.
    pub fn stop_fire(&mut self, now: f32, owner: &OwnerState) {
        if !self.wants_to_fire {
            return;
        }

        if self.role.is_replica() {
            self.events.push(WeaponEvent::Forward(WeaponRequest::StopFire));
        }

        self.wants_to_fire = false;
        self.determine_state(now, owner);
    }

    /// No-op unless `can_reload`. Replica только форвардит запрос и ждёт snapshot.
    pub fn start_reload(&mut self, now: f32, owner: &OwnerState) {
        if !self.can_reload(owner) {
            return;
        }

        if self.role.is_replica() {
            // Один запрос на reload до ответа authority (fire tick зовёт start_reload каждый тик)
            if !self.reload_requested {
                self.reload_requested = true;
                self.events.push(WeaponEvent::Forward(WeaponRequest::StartReload));
            }
            return;
        }

        self.begin_reload(now, owner);
    }

    /// Interrupt reload (always accepted; no-op if not reloading).
    ///
    /// Прерванный reload не доливает магазин.
    pub fn stop_reload(&mut self, now: f32, owner: &OwnerState) {
        if self.role.is_replica() {
            if self.pending_reload || self.state == WeaponState::Reloading {
                self.events.push(WeaponEvent::Forward(WeaponRequest::StopReload));
            }
            return;
        }

        self.finish_reload(now, owner, true);
    }

    /// Authority pickup; returns rounds added (capped at `max_ammo`).
    pub fn give_ammo(&mut self, amount: u32) -> u32 {
        if self.role.is_replica() {
            return 0;
        }
        self.ammo.give(amount, &self.config)
    }

    // ===== Transitions =====

    /// Recompute state from pending_reload / wants_to_fire / gates.
    pub fn determine_state(&mut self, now: f32, owner: &OwnerState) {
        let new_state = if self.pending_reload {
            if self.can_reload(owner) {
                WeaponState::Reloading
            } else {
                // Reload отложен: остаёмся в текущем state
                self.state
            }
        } else if self.wants_to_fire && owner.alive {
            // Без state гейта: выход из Reloading сразу в Firing, если курок зажат
            WeaponState::Firing
        } else {
            WeaponState::Idle
        };

        self.set_state(new_state, now);
    }

    fn set_state(&mut self, new_state: WeaponState, now: f32) {
        let previous = self.state;
        if previous == new_state {
            return;
        }

        if previous == WeaponState::Firing {
            self.cancel_fire_tick();
        }

        self.state = new_state;

        if new_state == WeaponState::Firing {
            self.schedule_fire_tick(now);
        }

        self.events.push(WeaponEvent::StateChanged {
            from: previous,
            to: new_state,
        });
    }

    /// Repeating fire tick; first delay keeps pacing across stop/start.
    fn schedule_fire_tick(&mut self, now: f32) {
        self.cancel_fire_tick();

        let delay = self
            .last_fire_time
            .map(|last| (last + self.time_between_shots - now).max(0.0))
            .unwrap_or(0.0);

        self.fire_timer = Some(self.timers.schedule(
            now,
            delay,
            Some(self.time_between_shots),
            WeaponTimer::HandleFiring,
        ));
    }

    fn cancel_fire_tick(&mut self) {
        if let Some(handle) = self.fire_timer.take() {
            self.timers.cancel(handle);
        }
    }

    /// Fire tick body.
    ///
    /// Тик, пришедший во время Reloading, отклоняется гейтами (`can_fire` и
    /// `can_reload` оба false): порядок таймеров не важен.
    pub fn handle_firing(&mut self, now: f32, owner: &OwnerState) {
        if self.ammo.has_rounds(&self.config) && self.can_fire(owner) {
            match self.role {
                NetRole::Authority => {
                    self.events.push(WeaponEvent::ShotRequested { predicted: false });
                    self.use_ammo();
                }
                NetRole::Replica => {
                    self.events.push(WeaponEvent::ShotRequested { predicted: true });
                }
            }
            self.last_fire_time = Some(now);

            // Последний патрон в магазине → сразу reload
            if self.role.is_authority() && self.ammo.in_clip() == 0 && self.can_reload(owner) {
                self.start_reload(now, owner);
            }
        } else if self.can_reload(owner) {
            self.start_reload(now, owner);
        }

        if self.state == WeaponState::Firing && !self.can_fire(owner) {
            self.determine_state(now, owner);
        }
    }

    /// Consume one round (authority only).
    pub fn use_ammo(&mut self) {
        if self.role.is_replica() {
            return;
        }
        self.ammo.use_ammo(&self.config);
    }

    /// Refill the clip from reserve (authority only). Returns rounds moved.
    pub fn reload_weapon(&mut self) -> u32 {
        if self.role.is_replica() {
            return 0;
        }

        let rounds = self.ammo.reload(&self.config);
        self.events.push(WeaponEvent::ClipReloaded {
            rounds,
            in_clip: self.ammo.in_clip(),
            reserve: self.ammo.reserve(),
        });
        rounds
    }

    fn reload_duration(&self, owner: &OwnerState) -> f32 {
        owner
            .reload_animation
            .filter(|duration| *duration > 0.0)
            .unwrap_or(self.config.no_anim_reload_duration)
            .max(MIN_RELOAD_DURATION)
    }

    fn begin_reload(&mut self, now: f32, owner: &OwnerState) {
        self.pending_reload = true;
        self.set_state(WeaponState::Reloading, now);

        let duration = self.reload_duration(owner);

        // Refill ставим раньше stop: при равном due он сработает первым
        if let Some(handle) = self.reload_weapon_timer.take() {
            self.timers.cancel(handle);
        }
        if self.role.is_authority() {
            let refill_delay = (duration - RELOAD_REFILL_LEAD).max(MIN_RELOAD_DURATION);
            self.reload_weapon_timer =
                Some(self.timers.schedule(now, refill_delay, None, WeaponTimer::ReloadWeapon));
        }

        if let Some(handle) = self.stop_reload_timer.take() {
            self.timers.cancel(handle);
        }
        self.stop_reload_timer = Some(self.timers.schedule(now, duration, None, WeaponTimer::StopReload));

        self.events.push(WeaponEvent::ReloadStarted { duration });
    }

    fn finish_reload(&mut self, now: f32, owner: &OwnerState, interrupted: bool) {
        if !self.pending_reload && self.state != WeaponState::Reloading {
            return;
        }

        if interrupted {
            if let Some(handle) = self.reload_weapon_timer.take() {
                self.timers.cancel(handle);
            }
        }
        if let Some(handle) = self.stop_reload_timer.take() {
            self.timers.cancel(handle);
        }

        self.pending_reload = false;
        self.determine_state(now, owner);
        self.events.push(WeaponEvent::ReloadStopped);
    }

    /// Run every timer due at or before `now`, each at its own due time.
    pub fn advance(&mut self, now: f32, owner: &OwnerState) {
        while let Some(due) = self.timers.pop_due(now) {
            match due.action {
                WeaponTimer::HandleFiring => {
                    if self.fire_timer == Some(due.handle) {
                        self.handle_firing(due.due, owner);
                    }
                }
                WeaponTimer::ReloadWeapon => {
                    if self.reload_weapon_timer == Some(due.handle) {
                        self.reload_weapon_timer = None;
                        self.reload_weapon();
                    }
                }
                WeaponTimer::StopReload => {
                    if self.stop_reload_timer == Some(due.handle) {
                        self.stop_reload_timer = None;
                        self.finish_reload(due.due, owner, false);
                    }
                }
            }
        }
    }

    /// Resolve one shot: cone spread → trace → surface damage.
    ///
    /// Authority бампает `replication_count` и запоминает trace;
    /// predicted (replica) выстрел ничего не меняет.
    pub fn fire<T, R>(
        &mut self,
        shooter: Entity,
        aim: &Aim,
        owner: &OwnerState,
        tracer: &T,
        rng: &mut R,
    ) -> Option<ShotOutcome>
    where
        T: HitScanTracer + ?Sized,
        R: Rng + ?Sized,
    {
        if !owner.alive {
            return None;
        }

        let half_angle = (self.config.shoot_cone_angle_degrees * 0.5).to_radians();
        let direction = cone_spread(aim.direction, half_angle, half_angle, rng);
        let end = aim.origin + direction * self.config.weapon_range;

        let hit = tracer.trace(aim.origin, end, &[shooter]);

        let mut trace = HitScanTrace {
            origin: aim.origin,
            direction,
            trace_end: hit.map_or(end, |hit| hit.point),
            did_hit: hit.is_some(),
            hit_point: hit.map_or(Vec3::ZERO, |hit| hit.point),
            hit_normal: hit.map_or(Vec3::ZERO, |hit| hit.normal),
            surface: hit.map_or_else(Default::default, |hit| hit.surface),
            replication_count: self.last_trace.replication_count,
        };

        let predicted = self.role.is_replica();
        if !predicted {
            trace.replication_count = trace.replication_count.wrapping_add(1);
            self.last_trace = trace;
        }

        Some(ShotOutcome {
            trace,
            hit,
            damage: hit.map_or(0.0, |hit| damage_for_surface(&self.config, hit.surface)),
            predicted,
        })
    }

    // ===== Replication =====

    pub fn snapshot(&self) -> WeaponSnapshot {
        WeaponSnapshot {
            ammo_in_clip: self.ammo.in_clip(),
            ammo_total: self.ammo.total(),
            pending_reload: self.pending_reload,
            trace: self.last_trace,
        }
    }

    /// Replica: apply authoritative state. Authority ignores snapshots.
    pub fn apply_snapshot(&mut self, now: f32, owner: &OwnerState, snapshot: &WeaponSnapshot) {
        if self.role.is_authority() {
            crate::logger::log_warning("Weapon: authority ignores incoming snapshot");
            return;
        }

        let ammo = Ammo::from_counts(
            snapshot.ammo_in_clip.min(self.config.ammo_per_clip),
            snapshot.ammo_total,
        );
        // Authority ответила (reload начат или ammo сдвинулось): можно просить снова
        if snapshot.pending_reload != self.replicated_pending_reload || ammo != self.ammo {
            self.reload_requested = false;
        }
        self.ammo = ammo;

        // Реагируем на фронты authority pending_reload, не на локальное состояние
        let rising = snapshot.pending_reload && !self.replicated_pending_reload;
        let falling = !snapshot.pending_reload && self.replicated_pending_reload;
        self.replicated_pending_reload = snapshot.pending_reload;

        if rising {
            self.begin_reload(now, owner);
        } else if falling {
            self.finish_reload(now, owner, true);
        }

        if snapshot.trace.replication_count != self.last_trace.replication_count {
            self.last_trace = snapshot.trace;
            self.events.push(WeaponEvent::TraceReplicated(snapshot.trace));
        }
    }
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::warn;

use dmx_expr::CompiledExpr;
use dmx_model::{channel_index, clamp_dmx, ChannelNumber, PlaybackState, PlaybackStatus, ProgrammableScene, Sequence, StepTarget, UNIVERSE_SIZE};
use dmx_universe::UniverseBuffer;

use crate::activity::ActivityClock;
use crate::command::Command;
use crate::error::EngineError;
use crate::handle::EngineHandle;
use crate::store::Store;
use crate::tick::TickRate;

/// Linear interpolation from a sampled start frame to a target value
/// vector, ticked at the engine rate until `duration_ms` elapses.
struct TransitionJob {
	start: [u8; UNIVERSE_SIZE],
	target: Vec<Option<u8>>,
	started_at: Instant,
	duration_ms: u64,
}

impl TransitionJob {
	fn writes_at(&self, now: Instant) -> (Vec<(ChannelNumber, u8)>, bool) {
		let elapsed_ms = (now.saturating_duration_since(self.started_at).as_millis() as u64).min(self.duration_ms);
		let frac = if self.duration_ms == 0 {
			1.0
		} else {
			elapsed_ms as f64 / self.duration_ms as f64
		};

		let writes = self
			.target
			.iter()
			.enumerate()
			.filter_map(|(idx, target)| {
				let target_value = (*target)?;
				let start_value = f64::from(self.start[idx]);
				let value = start_value + (f64::from(target_value) - start_value) * frac;
				Some(((idx + 1) as ChannelNumber, clamp_dmx(value)))
			})
			.collect();

		(writes, elapsed_ms >= self.duration_ms)
	}
}

struct SequenceJob {
	sequence: Sequence,
	step_index: usize,
	step_started_at: Instant,
	transition: Option<TransitionJob>,
}

struct ProgrammableJob {
	scene: ProgrammableScene,
	compiled: Vec<(ChannelNumber, Option<CompiledExpr>)>,
	started_at: Instant,
}

enum ActiveJob {
	None,
	Transition(TransitionJob),
	Sequence(SequenceJob),
	Programmable(ProgrammableJob),
}

/// The playback engine actor: the sole owner of [`PlaybackState`] and the
/// only task that writes to the universe buffer on behalf of playback.
/// Every mutation — a command from a handle, or an internal `Tick` from a
/// `schedule_wake` timer — arrives through the same queue and is processed
/// to completion before the next.
pub struct EngineActor {
	universe: Arc<UniverseBuffer>,
	store: Arc<Store>,
	tick_rate: Arc<TickRate>,
	receiver: mpsc::Receiver<Command>,
	self_sender: mpsc::Sender<Command>,
	state: PlaybackState,
	job: ActiveJob,
	generation: u64,
}

impl EngineActor {
	/// Build the actor and its cloneable handle, sharing `universe` with
	/// the sender fan-out and anything else that needs a read-only view.
	#[must_use]
	pub fn new(universe: Arc<UniverseBuffer>) -> (Self, EngineHandle) {
		let (sender, receiver) = mpsc::channel(256);
		let store = Arc::new(Store::new());
		let activity = Arc::new(ActivityClock::new());
		let tick_rate = Arc::new(TickRate::default());

		let actor = Self {
			universe,
			store: Arc::clone(&store),
			tick_rate: Arc::clone(&tick_rate),
			receiver,
			self_sender: sender.clone(),
			state: PlaybackState::Idle,
			job: ActiveJob::None,
			generation: 0,
		};
		let handle = EngineHandle::new(sender, store, activity, tick_rate);
		(actor, handle)
	}

	pub async fn run(mut self) {
		while let Some(command) = self.receiver.recv().await {
			match command {
				Command::PlayScene { id, transition_seconds, reply } => {
					let _ = reply.send(self.play_scene(&id, transition_seconds));
				}
				Command::PlaySequence { id, reply } => {
					let _ = reply.send(self.play_sequence(&id));
				}
				Command::PlayProgrammable { id, reply } => {
					let _ = reply.send(self.play_programmable(&id));
				}
				Command::SetChannel { channel, value, reply } => {
					self.set_channel(channel, value);
					let _ = reply.send(());
				}
				Command::Stop { reply } => {
					self.stop();
					let _ = reply.send(());
				}
				Command::Status { reply } => {
					let _ = reply.send(self.status());
				}
				Command::Tick { generation } => {
					if generation == self.generation {
						self.on_tick();
					}
				}
			}
		}
	}

	fn status(&self) -> PlaybackStatus {
		let step_progress_percent = match (&self.state, &self.job) {
			(PlaybackState::RunningSequence { .. }, ActiveJob::Sequence(seq_job)) => {
				let step = &seq_job.sequence.steps[seq_job.step_index];
				if step.duration_ms == 0 {
					Some(100.0)
				} else {
					let elapsed = seq_job.step_started_at.elapsed().as_millis() as u64;
					Some((100.0 * elapsed as f64 / step.duration_ms as f64).min(100.0))
				}
			}
			(PlaybackState::RunningProgrammable { .. }, ActiveJob::Programmable(job)) => {
				let elapsed = job.started_at.elapsed().as_millis() as u64;
				Some(job.scene.percent_elapsed(elapsed))
			}
			_ => None,
		};

		PlaybackStatus {
			is_playing: self.state.is_playing(),
			state: self.state.clone(),
			step_progress_percent,
		}
	}

	fn next_generation(&mut self) -> u64 {
		self.generation += 1;
		self.generation
	}

	fn resolve_target(&self, target: &StepTarget) -> Result<Vec<Option<u8>>, EngineError> {
		match target {
			StepTarget::SceneRef(id) => {
				let scene = self.store.get_scene(id).ok_or_else(|| EngineError::NotFound(id.clone()))?;
				Ok(scene.values)
			}
			StepTarget::Inline(map) => {
				let mut values = vec![None; UNIVERSE_SIZE];
				for (&channel, &value) in map {
					if let Some(idx) = channel_index(channel) {
						values[idx] = Some(value);
					}
				}
				Ok(values)
			}
		}
	}

	fn play_scene(&mut self, id: &str, transition_seconds: Option<f64>) -> Result<(), EngineError> {
		let scene = self.store.get_scene(id).ok_or_else(|| EngineError::NotFound(id.to_string()))?;
		let generation = self.next_generation();
		self.state = PlaybackState::StaticScene { scene_id: id.to_string() };

		let duration_ms = transition_seconds.filter(|s| *s > 0.0).map(|s| (s * 1000.0).round() as u64);
		match duration_ms {
			None => {
				self.job = ActiveJob::None;
				self.apply_values(&scene.values);
			}
			Some(duration_ms) => {
				self.job = ActiveJob::Transition(TransitionJob {
					start: self.universe.snapshot(),
					target: scene.values,
					started_at: Instant::now(),
					duration_ms,
				});
				self.schedule_wake(generation, self.tick_interval());
			}
		}
		Ok(())
	}

	fn play_sequence(&mut self, id: &str) -> Result<(), EngineError> {
		let sequence = self.store.get_sequence(id).ok_or_else(|| EngineError::NotFound(id.to_string()))?;
		if sequence.steps.is_empty() {
			return Err(EngineError::NotFound(format!("{id} has no steps")));
		}
		let generation = self.next_generation();
		self.state = PlaybackState::RunningSequence {
			sequence_id: id.to_string(),
			step_index: 0,
		};
		self.enter_step(generation, sequence, 0);
		Ok(())
	}

	/// Apply (or begin fading into) `sequence.steps[step_index]` and
	/// schedule the next wake at whichever comes first: the next transition
	/// tick, or the step's duration boundary.
	fn enter_step(&mut self, generation: u64, sequence: Sequence, step_index: usize) {
		let step = sequence.steps[step_index].clone();
		let target = self.resolve_target(&step.target).unwrap_or_else(|err| {
			warn!(error = %err, "sequence step target missing, holding current values");
			vec![None; UNIVERSE_SIZE]
		});

		let fade_ms = step.fade_ms.unwrap_or(0);
		let transition = if fade_ms > 0 {
			Some(TransitionJob {
				start: self.universe.snapshot(),
				target,
				started_at: Instant::now(),
				duration_ms: fade_ms,
			})
		} else {
			self.apply_values(&target);
			None
		};

		let wake_delay = if transition.is_some() {
			self.tick_interval()
		} else {
			Duration::from_millis(step.duration_ms)
		};

		self.job = ActiveJob::Sequence(SequenceJob {
			sequence,
			step_index,
			step_started_at: Instant::now(),
			transition,
		});
		self.schedule_wake(generation, wake_delay);
	}

	fn play_programmable(&mut self, id: &str) -> Result<(), EngineError> {
		let scene = self.store.get_programmable(id).ok_or_else(|| EngineError::NotFound(id.to_string()))?;
		let generation = self.next_generation();
		self.state = PlaybackState::RunningProgrammable { scene_id: id.to_string() };

		let compiled = scene
			.expressions
			.iter()
			.map(|(&channel, source)| match CompiledExpr::compile(source) {
				Ok(expr) => (channel, Some(expr)),
				Err(err) => {
					warn!(channel, %err, "programmable expression failed to compile, channel held at 0");
					(channel, None)
				}
			})
			.collect();

		let job = ProgrammableJob {
			scene,
			compiled,
			started_at: Instant::now(),
		};
		self.tick_programmable(generation, job);
		Ok(())
	}

	fn set_channel(&mut self, channel: ChannelNumber, value: u8) {
		if self.state.is_playing() || !matches!(self.job, ActiveJob::None) {
			self.next_generation();
			self.job = ActiveJob::None;
			self.state = PlaybackState::Idle;
		}
		self.universe.write(channel, clamp_dmx(f64::from(value)));
	}

	fn stop(&mut self) {
		self.next_generation();
		self.job = ActiveJob::None;
		self.state = PlaybackState::Idle;
	}

	fn apply_values(&self, values: &[Option<u8>]) {
		let writes: Vec<_> = values.iter().enumerate().filter_map(|(idx, v)| v.map(|value| ((idx + 1) as ChannelNumber, value))).collect();
		if !writes.is_empty() {
			self.universe.write_many(writes);
		}
	}

	fn tick_interval(&self) -> Duration {
		Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.effective_hz()))
	}

	/// Schedule a `Tick { generation }` to arrive back on this actor's own
	/// queue after `delay`, floored at one tick interval so a zero-duration
	/// step still yields instead of busy-looping.
	fn schedule_wake(&self, generation: u64, delay: Duration) {
		let delay = delay.max(self.tick_interval());
		let sender = self.self_sender.clone();
		tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			let _ = sender.send(Command::Tick { generation }).await;
		});
	}

	fn on_tick(&mut self) {
		match std::mem::replace(&mut self.job, ActiveJob::None) {
			ActiveJob::None => {}
			ActiveJob::Transition(job) => self.tick_transition(job),
			ActiveJob::Sequence(job) => self.tick_sequence(job),
			ActiveJob::Programmable(job) => self.tick_programmable(self.generation, job),
		}
	}

	fn tick_transition(&mut self, job: TransitionJob) {
		let generation = self.generation;
		let (writes, done) = job.writes_at(Instant::now());
		if !writes.is_empty() {
			self.universe.write_many(writes);
		}
		if done {
			self.job = ActiveJob::None;
		} else {
			self.job = ActiveJob::Transition(job);
			self.schedule_wake(generation, self.tick_interval());
		}
	}

	fn tick_sequence(&mut self, mut job: SequenceJob) {
		let generation = self.generation;

		if let Some(transition) = job.transition.take() {
			let (writes, done) = transition.writes_at(Instant::now());
			if !writes.is_empty() {
				self.universe.write_many(writes);
			}
			if done {
				let step_duration = job.sequence.steps[job.step_index].duration_ms;
				let wake_delay = Duration::from_millis(step_duration).saturating_sub(job.step_started_at.elapsed());
				self.job = ActiveJob::Sequence(job);
				self.schedule_wake(generation, wake_delay);
			} else {
				job.transition = Some(transition);
				self.job = ActiveJob::Sequence(job);
				self.schedule_wake(generation, self.tick_interval());
			}
			return;
		}

		let step_duration = Duration::from_millis(job.sequence.steps[job.step_index].duration_ms);
		if job.step_started_at.elapsed() < step_duration {
			let remaining = step_duration.saturating_sub(job.step_started_at.elapsed());
			self.job = ActiveJob::Sequence(job);
			self.schedule_wake(generation, remaining);
			return;
		}

		let next_index = job.step_index + 1;
		if next_index >= job.sequence.steps.len() {
			if job.sequence.r#loop {
				self.state = PlaybackState::RunningSequence {
					sequence_id: job.sequence.id.clone(),
					step_index: 0,
				};
				self.enter_step(generation, job.sequence, 0);
			} else {
				self.job = ActiveJob::None;
				self.state = PlaybackState::Idle;
			}
		} else {
			self.state = PlaybackState::RunningSequence {
				sequence_id: job.sequence.id.clone(),
				step_index: next_index,
			};
			self.enter_step(generation, job.sequence, next_index);
		}
	}

	fn tick_programmable(&mut self, generation: u64, mut job: ProgrammableJob) {
		let elapsed_ms = job.started_at.elapsed().as_millis() as u64;
		let t = elapsed_ms as f64 / 1000.0;
		let p = job.scene.percent_elapsed(elapsed_ms);

		let writes: Vec<_> = job.compiled.iter().map(|(channel, expr)| (*channel, expr.as_ref().map_or(0, |e| e.eval_dmx(t, p)))).collect();
		if !writes.is_empty() {
			self.universe.write_many(writes);
		}

		if elapsed_ms >= job.scene.duration_ms {
			if job.scene.r#loop {
				job.started_at = Instant::now();
				self.job = ActiveJob::Programmable(job);
				self.schedule_wake(generation, self.tick_interval());
			} else {
				self.job = ActiveJob::None;
				self.state = PlaybackState::Idle;
			}
		} else {
			self.job = ActiveJob::Programmable(job);
			self.schedule_wake(generation, self.tick_interval());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dmx_model::Scene;
	use tokio::time::{sleep, Duration as TokioDuration};

	fn spawn_actor() -> (EngineHandle, Arc<UniverseBuffer>) {
		let universe = Arc::new(UniverseBuffer::new());
		let (actor, handle) = EngineActor::new(Arc::clone(&universe));
		tokio::spawn(actor.run());
		(handle, universe)
	}

	#[tokio::test]
	async fn play_scene_without_transition_applies_immediately() {
		let (handle, universe) = spawn_actor();
		handle.store().put_scene(Scene::new("red", vec![Some(255), None, Some(0)]));

		handle.play_scene("red", None).await.unwrap();
		let status = handle.status().await.unwrap();
		assert_eq!(status.state, PlaybackState::StaticScene { scene_id: "red".into() });

		let snapshot = universe.snapshot();
		assert_eq!(snapshot[0], 255);
		assert_eq!(snapshot[2], 0);
	}

	#[tokio::test]
	async fn unknown_scene_is_not_found() {
		let (handle, _universe) = spawn_actor();
		let err = handle.play_scene("missing", None).await.unwrap_err();
		assert_eq!(err, EngineError::NotFound("missing".to_string()));
	}

	#[tokio::test]
	async fn set_channel_preempts_active_playback() {
		let (handle, universe) = spawn_actor();
		handle.store().put_scene(Scene::new("red", vec![Some(255)]));
		handle.play_scene("red", Some(5.0)).await.unwrap();

		handle.set_channel(1, 0).await.unwrap();
		let status = handle.status().await.unwrap();
		assert_eq!(status.state, PlaybackState::Idle);
		assert_eq!(universe.snapshot()[0], 0);
	}

	#[tokio::test]
	async fn transition_interpolates_and_settles_on_target() {
		let (handle, universe) = spawn_actor();
		handle.tick_rate().set(60);
		handle.store().put_scene(Scene::new("red", vec![Some(255)]));

		handle.play_scene("red", Some(0.2)).await.unwrap();
		sleep(TokioDuration::from_millis(300)).await;

		assert_eq!(universe.snapshot()[0], 255);
	}

	#[tokio::test]
	async fn stop_leaves_buffer_untouched_and_state_idle() {
		let (handle, universe) = spawn_actor();
		handle.store().put_scene(Scene::new("red", vec![Some(255)]));
		handle.play_scene("red", None).await.unwrap();

		handle.stop().await.unwrap();
		let status = handle.status().await.unwrap();
		assert_eq!(status.state, PlaybackState::Idle);
		assert_eq!(universe.snapshot()[0], 255);
	}
}

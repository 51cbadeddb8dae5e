//! Generative chiptune sequencer
//!
//! A self-contained music service: a fixed 16-step synthwave pattern
//! (square-wave bassline, triangle arpeggio, noise hat) rendered
//! sample-accurately inside the audio callback. The callback always writes
//! a buffer ahead of real time, so it is its own look-ahead scheduler -
//! game logic never touches it beyond start/stop/volume.
//!
//! Platform-specific output:
//! - Native: cpal stream, state shared behind an Arc<Mutex>
//! - WASM: no-op stub (the web build ships silent for now)

use std::sync::{Arc, Mutex};

/// Sample rate for audio output
pub const SAMPLE_RATE: u32 = 44100;

const BPM: f32 = 104.0;
const STEPS_PER_PATTERN: usize = 16;

/// Master output attenuation; raw voices sum well above unity
const OUTPUT_GAIN: f32 = 0.25;

/// Bass note per step in Hz; 0.0 is a rest. Am / F / G, eighth-note drive.
const BASS_PATTERN: [f32; STEPS_PER_PATTERN] = [
    55.00, 55.00, 0.0, 55.00, 55.00, 0.0, 55.00, 55.00, //
    43.65, 43.65, 0.0, 43.65, 49.00, 49.00, 0.0, 49.00,
];

/// Arpeggio note per step in Hz, one octave bed above the bass.
const ARP_PATTERN: [f32; STEPS_PER_PATTERN] = [
    220.00, 261.63, 329.63, 440.00, 329.63, 261.63, 220.00, 261.63, //
    174.61, 220.00, 261.63, 349.23, 196.00, 246.94, 293.66, 392.00,
];

/// Sequencer state shared between the game thread and the audio callback.
struct SequencerState {
    playing: bool,
    /// Master volume, 0.0 to 1.0
    volume: f32,
    step: usize,
    samples_into_step: u32,
    bass_phase: f32,
    arp_phase: f32,
    /// xorshift state for the noise hat
    noise: u32,
}

impl SequencerState {
    fn new() -> Self {
        Self {
            playing: false,
            volume: 1.0,
            step: 0,
            samples_into_step: 0,
            bass_phase: 0.0,
            arp_phase: 0.0,
            noise: 0x2F6E_2B1D,
        }
    }
}

/// Samples per sixteenth-note step at the fixed tempo.
fn samples_per_step() -> u32 {
    (SAMPLE_RATE as f32 * 60.0 / (BPM * 4.0)) as u32
}

fn square(phase: f32) -> f32 {
    if phase.fract() < 0.5 {
        1.0
    } else {
        -1.0
    }
}

fn triangle(phase: f32) -> f32 {
    4.0 * (phase.fract() - 0.5).abs() - 1.0
}

/// Render one interleaved-stereo block. Pure with respect to the outside
/// world, so it can be tested without an audio device.
fn render_block(state: &mut SequencerState, out: &mut [f32]) {
    let step_len = samples_per_step();

    for frame in out.chunks_exact_mut(2) {
        // Progress through the current step, 0..1, drives the envelopes
        let t = state.samples_into_step as f32 / step_len as f32;
        let mut sample = 0.0f32;

        let bass_freq = BASS_PATTERN[state.step];
        if bass_freq > 0.0 {
            state.bass_phase = (state.bass_phase + bass_freq / SAMPLE_RATE as f32).fract();
            sample += square(state.bass_phase) * 0.50 * (1.0 - t);
        }

        state.arp_phase = (state.arp_phase + ARP_PATTERN[state.step] / SAMPLE_RATE as f32).fract();
        sample += triangle(state.arp_phase) * 0.35 * (1.0 - t).powi(2);

        // Off-beat noise hat
        if state.step % 4 == 2 {
            state.noise ^= state.noise << 13;
            state.noise ^= state.noise >> 17;
            state.noise ^= state.noise << 5;
            let noise = (state.noise as f32 / u32::MAX as f32) * 2.0 - 1.0;
            sample += noise * 0.15 * (1.0 - t).powi(4);
        }

        let value = sample * state.volume * OUTPUT_GAIN;
        frame[0] = value;
        frame[1] = value;

        state.samples_into_step += 1;
        if state.samples_into_step >= step_len {
            state.samples_into_step = 0;
            state.step = (state.step + 1) % STEPS_PER_PATTERN;
        }
    }
}

// =============================================================================
// Native audio output using cpal
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleRate, Stream, StreamConfig};

    pub fn init_audio_stream(state: Arc<Mutex<SequencerState>>) -> Option<Stream> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;

        let config = StreamConfig {
            channels: 2,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut state = state.lock().unwrap();
                    if state.playing {
                        render_block(&mut state, data);
                    } else {
                        for sample in data.iter_mut() {
                            *sample = 0.0;
                        }
                    }
                },
                |err| eprintln!("audio stream error: {}", err),
                None,
            )
            .ok()?;

        stream.play().ok()?;
        Some(stream)
    }
}

/// The sequencer handle owned by the frame loop.
#[cfg(not(target_arch = "wasm32"))]
pub struct Chiptune {
    state: Arc<Mutex<SequencerState>>,
    /// Kept alive for the duration of the game; dropping it stops output
    _stream: Option<cpal::Stream>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Chiptune {
    /// Open the output stream. A machine without an audio device gets a
    /// silent but otherwise functional sequencer.
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(SequencerState::new()));
        let stream = native::init_audio_stream(state.clone());
        if stream.is_none() {
            eprintln!("no audio output device, music disabled");
        }
        Self {
            state,
            _stream: stream,
        }
    }

    /// Start playback from the top of the pattern.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = true;
        state.step = 0;
        state.samples_into_step = 0;
    }

    pub fn stop(&self) {
        self.state.lock().unwrap().playing = false;
    }

    /// Set master volume (clamped to 0.0..=1.0)
    pub fn set_volume(&self, volume: f32) {
        self.state.lock().unwrap().volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for Chiptune {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// WASM stub
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub struct Chiptune {
    state: Arc<Mutex<SequencerState>>,
}

#[cfg(target_arch = "wasm32")]
impl Chiptune {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SequencerState::new())),
        }
    }

    pub fn start(&self) {
        self.state.lock().unwrap().playing = true;
    }

    pub fn stop(&self) {
        self.state.lock().unwrap().playing = false;
    }

    pub fn set_volume(&self, volume: f32) {
        self.state.lock().unwrap().volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for Chiptune {
    fn default() -> Self {
        Self::new()
    }
}

//! Audio setup and application runner.
//!
//! The drum machine lives behind an `Arc<Mutex>`: the cpal callback locks
//! it to render, the UI thread locks it to edit and to take snapshots.
//! Rendered master samples are also pushed into a lock-free ring so the
//! UI can draw the scope and spectrum without touching the audio state.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

use gridbeat::{DrumMachine, MAX_BLOCK_SIZE};

use crate::ui::UiApp;

/// Capacity of the UI tap ring: a couple of callbacks' worth of audio.
const TAP_RING_CAPACITY: usize = 8 * MAX_BLOCK_SIZE;

pub struct App {
    machine: Option<DrumMachine>,
}

impl App {
    pub fn new() -> Self {
        Self { machine: None }
    }

    /// Supply a pre-built machine (ignoring its sample rate would be a
    /// bug, so the device rate wins: only used before audio setup).
    #[allow(dead_code)]
    pub fn with_machine(mut self, machine: DrumMachine) -> Self {
        self.machine = Some(machine);
        self
    }

    /// Open the default output device, start the stream, and hand the
    /// terminal to the UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let machine = self
            .machine
            .unwrap_or_else(|| DrumMachine::with_default_kit(sample_rate));
        let state = Arc::new(Mutex::new(machine));

        let (mut tap_tx, tap_rx) = rtrb::RingBuffer::<f32>::new(TAP_RING_CAPACITY);

        let audio_state = state.clone();
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let Ok(mut machine) = audio_state.lock() else {
                    data.fill(0.0);
                    return;
                };

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    machine.render_block(block);

                    // Mono master fanned out to every channel
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    // Tap for the scope; dropping samples when the UI
                    // lags is fine
                    for &s in block.iter() {
                        let _ = tap_tx.push(s);
                    }

                    frames_written += frames;
                }
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )?;
        stream.play()?;

        let terminal = ratatui::init();
        let result = UiApp::new(state, tap_rx, sample_rate).run(terminal);
        ratatui::restore();
        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

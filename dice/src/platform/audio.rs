//! Rattle playback through rodio.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};

use dice_core::{AudioOutput, CapabilityError, NoiseBurst};

/// The default output device. Dropping it closes the stream.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn open() -> Result<Self, CapabilityError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| CapabilityError::AudioUnavailable(e.to_string()))?;
        tracing::info!("Opened default audio output");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn open_boxed() -> Result<Box<dyn AudioOutput>, CapabilityError> {
        Ok(Box::new(Self::open()?))
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, burst: NoiseBurst) -> Result<(), CapabilityError> {
        let source = SamplesBuffer::new(1, burst.sample_rate, burst.samples);
        self.handle
            .play_raw(source)
            .map_err(|e| CapabilityError::Playback(e.to_string()))
    }
}

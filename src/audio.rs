//! Fire-and-forget sound cues. The game never depends on a sink succeeding.

use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    LineClear,
    BlockDrop,
    GameOver,
    LevelUp,
}

impl Sound {
    #[cfg(feature = "sound")]
    pub const ALL: [Self; 4] = [Self::LineClear, Self::BlockDrop, Self::GameOver, Self::LevelUp];

    pub fn name(self) -> &'static str {
        match self {
            Self::LineClear => "line_clear",
            Self::BlockDrop => "block_drop",
            Self::GameOver => "game_over",
            Self::LevelUp => "level_up",
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Plays nothing (`--mute`).
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _sound: Sound) {}
}

/// Rings the terminal bell for the louder cues. Block drops stay quiet,
/// they happen on every piece.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, sound: Sound) {
        if sound == Sound::BlockDrop {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|()| self.out.flush()) {
            debug!("bell for {} failed: {e}", sound.name());
        }
    }
}

/// Plays `<name>.wav` files through the default output device.
#[cfg(feature = "sound")]
pub mod wav {
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;
    use tracing::{debug, info};

    use super::{AudioSink, Sound};

    const SFX_VOLUME: f32 = 0.8;

    /// Read every cue found in `dir`. Missing files leave that cue silent.
    pub fn load_cues(dir: &Path) -> HashMap<Sound, Arc<[u8]>> {
        Sound::ALL
            .into_iter()
            .filter_map(|sound| {
                let path = dir.join(format!("{}.wav", sound.name()));
                match std::fs::read(&path) {
                    Ok(bytes) => Some((sound, Arc::from(bytes))),
                    Err(e) => {
                        debug!(path = %path.display(), "no sound file: {e}");
                        None
                    }
                }
            })
            .collect()
    }

    pub struct WavPlayer {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        cues: HashMap<Sound, Arc<[u8]>>,
    }

    impl WavPlayer {
        pub fn new(dir: &Path) -> Result<Self, rodio::StreamError> {
            let (stream, handle) = OutputStream::try_default()?;
            let cues = load_cues(dir);
            info!(dir = %dir.display(), cues = cues.len(), "audio ready");
            Ok(Self {
                _stream: stream,
                handle,
                cues,
            })
        }
    }

    impl AudioSink for WavPlayer {
        fn play(&mut self, sound: Sound) {
            let Some(bytes) = self.cues.get(&sound) else {
                return;
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            sink.set_volume(SFX_VOLUME);
            let Ok(source) = Decoder::new(Cursor::new(Arc::clone(bytes))) else {
                debug!("could not decode {}", sound.name());
                return;
            };
            sink.append(source);
            sink.detach();
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no terminal"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bell_skips_block_drop() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(Sound::BlockDrop);
        bell.play(Sound::LineClear);
        bell.play(Sound::LevelUp);
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn test_broken_output_is_ignored() {
        let mut bell = TerminalBell::new(Broken);
        bell.play(Sound::GameOver);
    }

    #[test]
    fn test_names() {
        assert_eq!(Sound::LineClear.name(), "line_clear");
        assert_eq!(Sound::BlockDrop.name(), "block_drop");
        assert_eq!(Sound::GameOver.name(), "game_over");
        assert_eq!(Sound::LevelUp.name(), "level_up");
    }
}

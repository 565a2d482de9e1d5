/// Named sound cues the stage can request.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Cue {
    Catch     = 0,
    Switch    = 1,
    Explosion = 2,
    Gift      = 3,
    Click     = 4,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Catch => "catch",
            Cue::Switch => "switch",
            Cue::Explosion => "explosion",
            Cue::Gift => "gift",
            Cue::Click => "click",
        }
    }
}

/// Fire-and-forget audio output. Playback failures stay inside the sink.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Keeps every cue in order. Handy for tests and replay logs.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
}

impl RecordingAudio {
    pub fn count(&self, cue: Cue) -> usize {
        self.played.iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        log::trace!("cue {}", cue.as_str());
        self.played.push(cue);
    }
}

impl<A: AudioSink + ?Sized> AudioSink for &mut A {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue);
    }
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue);
    }
}

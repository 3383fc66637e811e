use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hotdog_game::audio::*;

type PlayLog = Rc<RefCell<Vec<(usize, Duration)>>>;

/// Backend that records what it was asked to play.
struct RecordingBackend(PlayLog);

impl AudioBackend for RecordingBackend {
    fn play(&self, samples: Vec<f32>, _sample_rate: u32, delay: Duration) {
        self.0.borrow_mut().push((samples.len(), delay));
    }
}

fn recording_player() -> (CuePlayer, PlayLog) {
    let log: PlayLog = Rc::default();
    let player = CuePlayer::new(Some(Box::new(RecordingBackend(log.clone()))), 8_000);
    (player, log)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0, |m, s| m.max(s.abs()))
}

// ── synthesis ─────────────────────────────────────────────────────────────────

#[test]
fn shoot_tone_length_and_envelope() {
    let samples = Tone::SHOOT.synthesize(DEFAULT_SAMPLE_RATE);
    assert_eq!(samples.len(), 4_410);
    assert!(peak(&samples) <= Tone::SHOOT.gain + 1e-6);
    assert!(peak(&samples[samples.len() - 100..]) < 0.002);
}

#[test]
fn destroy_tone_is_louder_and_longer() {
    let samples = Tone::DESTROY.synthesize(DEFAULT_SAMPLE_RATE);
    assert_eq!(samples.len(), 8_820);
    assert!(peak(&samples) <= Tone::DESTROY.gain + 1e-6);
    assert!(peak(&samples[..100]) > Tone::SHOOT.gain);
}

#[test]
fn note_decays() {
    let samples = Tone::note(261.63).synthesize(DEFAULT_SAMPLE_RATE);
    assert_eq!(samples.len(), 13_230);
    assert_eq!(samples[0], 0.0);
    let head = peak(&samples[..2_000]);
    let tail = peak(&samples[samples.len() - 2_000..]);
    assert!(tail < head);
}

// ── cue player ────────────────────────────────────────────────────────────────

#[test]
fn shoot_and_destroy_play_immediately() {
    let (player, log) = recording_player();
    player.play_shoot_cue();
    player.play_destroy_cue();
    assert_eq!(*log.borrow(), vec![(800, Duration::ZERO), (1_600, Duration::ZERO)]);
}

#[test]
fn wave_clear_queues_four_staggered_notes() {
    let (player, log) = recording_player();
    player.play_wave_clear_cue();
    let delays: Vec<Duration> = log.borrow().iter().map(|&(_, d)| d).collect();
    assert_eq!(
        delays,
        vec![
            Duration::ZERO,
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(600),
        ]
    );
    assert!(log.borrow().iter().all(|&(len, _)| len == 2_400));
}

#[test]
fn missing_backend_is_silent() {
    let player = CuePlayer::new(None, DEFAULT_SAMPLE_RATE);
    assert!(player.is_silent());
    player.play_wave_clear_cue();
}

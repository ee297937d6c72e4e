//! Clip timeline for a body's animation set
//!
//! Animations are laid out one after another on a single timeline with a
//! one-second gap between them. Each becomes a named clip measured in frames;
//! an animation with an intro before its loop frame becomes two clips,
//! `NNNStart` and `NNNLoop`.

use serde::Serialize;

use super::Animation;
use crate::error::Result;

/// Gap between consecutive animations in milliseconds
pub const CLIP_GAP_MS: u32 = 1000;

/// Frame rate used when none is given
pub const DEFAULT_FPS: f32 = 30.0;

/// A named frame range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    pub name: String,
    pub start: f32,
    pub end: f32,
}

/// Clips for a list of animations played back to back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipTimeline {
    pub fps: f32,
    /// Timeline position of each animation's first frame in milliseconds
    pub offsets_ms: Vec<u32>,
    pub clips: Vec<Clip>,
}

impl ClipTimeline {
    /// Lay out `animations` in order
    ///
    /// Clip names use the 1-based position in `animations`, zero-padded to
    /// three digits. Animations without boneframes take no time.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidLoopFrame`] if an animation with
    /// boneframes has a loop frame outside its keyframes.
    pub fn build(animations: &[Animation], fps: f32) -> Result<Self> {
        let to_frames = |ms: u32| ms as f32 * fps / 1000.0;
        let mut offsets_ms = Vec::with_capacity(animations.len());
        let mut clips = Vec::new();
        let mut current = 0u32;

        for (i, anim) in animations.iter().enumerate() {
            let name = format!("{:03}", i + 1);
            let (duration, cut) = if anim.num_boneframes == 0 {
                (0, None)
            } else {
                (anim.duration_ms()?, anim.loop_start_ms()?)
            };

            let start = current;
            let end = current + duration;
            match cut {
                Some(cut) => {
                    let cut = current + cut;
                    clips.push(Clip {
                        name: format!("{name}Start"),
                        start: to_frames(start),
                        end: to_frames(cut),
                    });
                    clips.push(Clip {
                        name: format!("{name}Loop"),
                        start: to_frames(cut),
                        end: to_frames(end),
                    });
                }
                None => clips.push(Clip {
                    name,
                    start: to_frames(start),
                    end: to_frames(end),
                }),
            }
            offsets_ms.push(start);
            current = end + CLIP_GAP_MS;
        }

        tracing::debug!("Clip timeline: {} animations, {} clips", animations.len(), clips.len());
        Ok(Self {
            fps,
            offsets_ms,
            clips,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Render as `name;start;end;name;start;end...`
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.clips
            .iter()
            .map(|clip| format!("{};{};{}", clip.name, clip.start, clip.end))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::anm::parse_animation;
    use crate::formats::anm::reader::tests::encode;
    use pretty_assertions::assert_eq;

    fn anim(loop_frame: u16, lengths: &[u16]) -> Animation {
        let keyframes: Vec<_> = lengths
            .iter()
            .map(|&l| (l, [0, 0, 0], vec![(0, [0, 0, 0])]))
            .collect();
        parse_animation(&encode(loop_frame, &keyframes)).unwrap()
    }

    #[test]
    fn test_single_loop_clip() {
        // loops from frame 0: frames 0,1,0 at 0, 500, 1500 ms
        let timeline = ClipTimeline::build(&[anim(0, &[1000, 500])], DEFAULT_FPS).unwrap();
        assert_eq!(
            timeline.clips,
            vec![Clip {
                name: "001".into(),
                start: 0.0,
                end: 45.0
            }]
        );
    }

    #[test]
    fn test_intro_is_split_and_gap_applied() {
        let anims = [
            anim(2, &[100, 100, 100]),
            anim(1, &[100, 200, 300]),
        ];
        let timeline = ClipTimeline::build(&anims, DEFAULT_FPS).unwrap();

        // first: frames 0,1,2 at 0,100,200 ms, loop frame 2 at 200
        // second starts at 1200: frames 0,1,2,1 at +0,+200,+500,+700
        assert_eq!(timeline.offsets_ms, vec![0, 1200]);
        assert_eq!(
            timeline.to_csv(),
            "001Start;0;6;001Loop;6;6;002Start;36;42;002Loop;42;57"
        );
    }

    #[test]
    fn test_empty_timeline_renders_empty_csv() {
        let timeline = ClipTimeline::build(&[], DEFAULT_FPS).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.to_csv(), "");
    }

    #[test]
    fn test_animation_without_boneframes_takes_no_time() {
        let empty = parse_animation(&encode(0, &[])).unwrap();
        let timeline = ClipTimeline::build(&[empty, anim(0, &[100, 100])], DEFAULT_FPS).unwrap();
        assert_eq!(timeline.offsets_ms, vec![0, 1000]);
        assert_eq!(timeline.clips[0].end, 0.0);
        assert_eq!(timeline.len(), 2);
    }
}

// SPDX-License-Identifier: MPL-2.0
//! History laws checked across every history length the default capacity allows.
//!
//! Single-case behaviour (loading, debounce, individual transforms) is covered
//! by the session's unit tests; these sweep the stack sizes through the public API.

use clarifi_studio::domain::editing::{ResizeRequest, TransformOp};
use clarifi_studio::editor::{EditSession, ImageSource};
use clarifi_studio::error::{Error, HistoryDirection};
use clarifi_studio::media::{codec, RasterBuffer};
use image_rs::{ImageBuffer, Rgba};

const CAPACITY: u32 = 10;

fn pattern(width: u32, height: u32) -> RasterBuffer {
    RasterBuffer::from_image(ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
}

fn pattern_png(width: u32, height: u32) -> Vec<u8> {
    codec::encode(
        &pattern(width, height),
        codec::ExportFormat::Png,
        Default::default(),
    )
    .expect("encode pattern")
}

fn session_with(width: u32, height: u32) -> EditSession {
    let mut session = EditSession::default();
    session
        .load_image(ImageSource::from_bytes(pattern_png(width, height)))
        .expect("load pattern");
    session
}

/// A resize whose width differs from every other step, so each commit is distinct.
fn distinct_step(i: u32) -> TransformOp {
    TransformOp::Resize(ResizeRequest::exact(20 + i, 12))
}

#[test]
fn undo_walks_back_to_first_commit() {
    for commits in 1..=CAPACITY {
        let mut session = session_with(16, 12);
        let first = session.surface().clone();
        for i in 1..commits {
            session.apply_transform(distinct_step(i)).expect("step");
        }
        for _ in 1..commits {
            session.undo().expect("undo");
        }
        assert_eq!(session.surface(), &first, "after {commits} commits");
        assert!(!session.history().can_undo());
    }
}

#[test]
fn undo_then_redo_is_identity_at_every_cursor() {
    for cursor in 1..CAPACITY {
        let mut session = session_with(16, 12);
        for i in 1..CAPACITY {
            session.apply_transform(distinct_step(i)).expect("step");
        }
        for _ in cursor..CAPACITY - 1 {
            session.undo().expect("move the cursor");
        }

        let before = session.surface().clone();
        session.undo().expect("undo");
        session.redo().expect("redo");
        assert_eq!(session.surface(), &before, "cursor {cursor}");
    }
}

#[test]
fn overflow_keeps_only_the_newest_entries() {
    for commits in CAPACITY + 1..=CAPACITY + 5 {
        let mut session = session_with(16, 12);
        for i in 1..commits {
            session.apply_transform(distinct_step(i)).expect("step");
        }
        assert_eq!(session.history().len(), CAPACITY as usize);

        for _ in 1..CAPACITY {
            session.undo().expect("undo within capacity");
        }
        assert_eq!(
            session.undo(),
            Err(Error::NoMoreHistory(HistoryDirection::Undo))
        );
        // Entry k (0 = load) was made by step k; the oldest survivor is step commits - CAPACITY.
        let oldest = commits - CAPACITY;
        assert_eq!(
            session.surface().dimensions(),
            (20 + oldest, 12),
            "after {commits} commits"
        );
    }
}

#[test]
fn commit_after_any_number_of_undos_discards_redo() {
    for undone in 1..CAPACITY - 1 {
        let mut session = session_with(16, 12);
        for i in 1..CAPACITY {
            session.apply_transform(distinct_step(i)).expect("step");
        }
        for _ in 0..undone {
            session.undo().expect("undo");
        }
        session
            .apply_transform(TransformOp::Resize(ResizeRequest::exact(7, 7)))
            .expect("branch");

        assert_eq!(
            session.history().len(),
            (CAPACITY - undone) as usize + 1,
            "after {undone} undos"
        );
        assert!(!session.history().can_redo());
        assert_eq!(
            session.redo().map(|_| ()),
            Err(Error::NoMoreHistory(HistoryDirection::Redo))
        );
    }
}

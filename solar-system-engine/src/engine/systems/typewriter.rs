use bevy::prelude::*;
use constants::render_settings::TYPEWRITER_CHAR_INTERVAL;

use crate::engine::catalog::body_facts::ReferenceFacts;
use crate::engine::state::view_state::{BodyId, FrameSnapshot};

/// Progressive reveal of the selected body's description.
///
/// Restarts whenever the selection changes and empties on deselect, so a
/// reveal never continues into another body's text.
#[derive(Resource, Debug, Default)]
pub struct Typewriter {
    body: Option<BodyId>,
    text: String,
    elapsed: f32,
    revealed: usize,
}

/// Characters visible `elapsed` seconds into a reveal of `len` characters.
pub fn revealed_chars(elapsed: f32, len: usize) -> usize {
    if elapsed <= 0.0 {
        return 0;
    }
    ((elapsed / TYPEWRITER_CHAR_INTERVAL) as usize).min(len)
}

impl Typewriter {
    fn restart(&mut self, body: Option<BodyId>, text: String) {
        self.body = body;
        self.text = text;
        self.elapsed = 0.0;
        self.revealed = 0;
    }

    pub fn body(&self) -> Option<&BodyId> {
        self.body.as_ref()
    }

    /// Revealed prefix, cut on a character boundary.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.text.chars().count()
    }

    /// Follow the selection and advance the reveal by `delta` seconds.
    pub fn update(&mut self, selected: Option<&BodyId>, facts: &ReferenceFacts, delta: f32) {
        let description = |id: &BodyId| {
            facts
                .get(id)
                .map(|body| body.description.clone())
                .unwrap_or_default()
        };

        if self.body.as_ref() != selected {
            let text = selected.map(description).unwrap_or_default();
            self.restart(selected.cloned(), text);
        } else if self.text.is_empty() {
            // Facts may arrive after the selection was made.
            if let Some(id) = selected {
                let text = description(id);
                if !text.is_empty() {
                    self.restart(Some(id.clone()), text);
                }
            }
        }

        if self.is_complete() {
            return;
        }
        self.elapsed += delta.max(0.0);
        self.revealed = revealed_chars(self.elapsed, self.text.chars().count());
    }
}

pub fn advance_typewriter(
    time: Res<Time>,
    snapshot: Res<FrameSnapshot>,
    facts: Res<ReferenceFacts>,
    mut typewriter: ResMut<Typewriter>,
) {
    typewriter.update(
        snapshot.state.selected_body.as_ref(),
        &facts,
        time.delta_secs(),
    );
}

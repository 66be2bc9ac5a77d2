//! Creators screen state: the monitored account list plus the add-form input.

use crate::models::Creator;

#[derive(Debug, Default)]
pub struct CreatorsViewState {
    creators: Vec<Creator>,
    pub selected: usize,
    /// Username being typed into the add form; None when the form is closed
    pub add_input: Option<String>,
}

impl CreatorsViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_creators(&mut self, creators: Vec<Creator>) {
        self.creators = creators;
        if self.selected >= self.creators.len() {
            self.selected = self.creators.len().saturating_sub(1);
        }
    }

    pub fn creators(&self) -> &[Creator] {
        &self.creators
    }

    pub fn selected_creator(&self) -> Option<&Creator> {
        self.creators.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.creators.is_empty() && self.selected + 1 < self.creators.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_add_form(&mut self) {
        self.add_input = Some(String::new());
    }

    pub fn close_add_form(&mut self) {
        self.add_input = None;
    }

    pub fn is_adding(&self) -> bool {
        self.add_input.is_some()
    }

    pub fn push_input(&mut self, c: char) {
        if let Some(input) = &mut self.add_input {
            input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if let Some(input) = &mut self.add_input {
            input.pop();
        }
    }

    /// Take the typed username, closing the form.
    pub fn take_input(&mut self) -> Option<String> {
        self.add_input.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator(id: i64, username: &str) -> Creator {
        Creator {
            id,
            username: username.into(),
            display_name: None,
            follower_count: None,
            profile_pic_url: None,
            posts_count: 0,
            last_scan: None,
            biography: None,
        }
    }

    #[test]
    fn selection_clamps_after_removal() {
        let mut state = CreatorsViewState::new();
        state.set_creators(vec![creator(1, "a"), creator(2, "b"), creator(3, "c")]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_creator().unwrap().id, 3);

        state.set_creators(vec![creator(1, "a")]);
        assert_eq!(state.selected_creator().unwrap().id, 1);
    }

    #[test]
    fn add_form_collects_input() {
        let mut state = CreatorsViewState::new();
        assert!(!state.is_adding());
        state.open_add_form();
        for c in "@alice".chars() {
            state.push_input(c);
        }
        state.pop_input();
        assert_eq!(state.take_input().as_deref(), Some("@alic"));
        assert!(!state.is_adding());
    }
}

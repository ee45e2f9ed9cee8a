use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Project;
use crate::tracker::Tracker;

/// Lazy iterator over every project visible to the tracker's credentials.
///
/// Pages are fetched on demand. The first failed page yields an
/// [`Error::Enumeration`] and ends the iteration, since continuing past a
/// gap would silently drop projects.
pub struct ProjectPages<T: Tracker> {
    tracker: T,
    page_size: u32,
    next_start: u64,
    buffer: VecDeque<Project>,
    finished: bool,
}

impl<T: Tracker> ProjectPages<T> {
    pub fn new(tracker: T, page_size: u32) -> Self {
        Self {
            tracker,
            page_size: page_size.max(1),
            next_start: 0,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let start_at = self.next_start;
        let page = self
            .tracker
            .project_page(start_at, self.page_size)
            .map_err(|e| Error::enumeration(start_at, e))?;
        let received = page.projects.len() as u64;
        debug!(start_at, received, total = ?page.total, is_last = page.is_last, "Fetched project page.");

        self.next_start += received;
        let past_total = page.total.is_some_and(|total| self.next_start >= total);
        if received == 0 || page.is_last || past_total {
            self.finished = true;
        }
        self.buffer.extend(page.projects);
        Ok(())
    }
}

impl<T: Tracker> Iterator for ProjectPages<T> {
    type Item = Result<Project>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(project) = self.buffer.pop_front() {
                return Some(Ok(project));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

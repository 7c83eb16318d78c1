//! Paginator: places laid-out blocks onto fixed-size pages
//!
//! A cursor tracks the vertical space consumed on the current page. Blocks that
//! do not fit move to a fresh page (or split where their placement allows it);
//! table headers are reprinted at the top of every continuation page.

use log::{debug, warn};

use crate::blocks::{Block, LaidOut, Placement};
use crate::config::ReportConfig;
use crate::page::{Page, Slab};
use crate::types::PageGeometry;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    Placing,
    PageFull,
    ForcedBreak,
    Done,
}

/// Vertical cursor on the page being filled
struct Cursor {
    page: Page,
    used: f64,
    capacity: f64,
    left: f64,
    top: f64,
    placed_any: bool,
}

impl Cursor {
    fn new(number: u32, geometry: &PageGeometry) -> Self {
        Self {
            page: Page::new(number),
            used: 0.0,
            capacity: geometry.content_height(),
            left: geometry.margins.left,
            top: geometry.content_top(),
            placed_any: false,
        }
    }

    fn remaining(&self) -> f64 {
        self.capacity - self.used
    }

    /// Nothing placed yet on this page
    fn is_fresh(&self) -> bool {
        !self.placed_any
    }

    fn fits(&self, height: f64) -> bool {
        height <= self.remaining() + EPSILON
    }

    fn place(&mut self, slab: Slab) {
        let height = slab.height;
        let top = self.top - self.used;
        self.page.ops.extend(slab.placed_at(self.left, top));
        self.used += height;
        self.placed_any = true;
    }

    /// Vertical gap; dropped at the top of a page.
    fn space(&mut self, height: f64) {
        if !self.is_fresh() && height > 0.0 {
            self.used += height;
        }
    }
}

/// Lays a block sequence out onto pages
pub struct Paginator<'a> {
    config: &'a ReportConfig,
    state: PaginatorState,
    pages: Vec<Page>,
    cursor: Cursor,
}

impl<'a> Paginator<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            state: PaginatorState::Placing,
            pages: Vec::new(),
            cursor: Cursor::new(1, &config.geometry),
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// Place every block and return the finished pages (at least one).
    pub fn paginate(mut self, blocks: &[Block]) -> Vec<Page> {
        let width = self.config.geometry.content_width();
        for block in blocks {
            if let Block::PageBreak = block {
                self.forced_break();
                continue;
            }
            let laid = block.layout(width, self.config);
            self.place(laid);
        }

        self.transition(PaginatorState::Done);
        self.close_page();
        debug!("Paginated into {} page(s)", self.pages.len());
        self.pages
    }

    fn transition(&mut self, next: PaginatorState) {
        debug!(
            "Paginator {:?} -> {:?} on page {}",
            self.state, next, self.cursor.page.number
        );
        self.state = next;
    }

    fn close_page(&mut self) {
        let number = self.cursor.page.number;
        let finished = std::mem::replace(&mut self.cursor, Cursor::new(number + 1, &self.config.geometry));
        debug!(
            "Page {}: {} ops, {:.1}/{:.1}pt used",
            number,
            finished.page.ops.len(),
            finished.used,
            finished.capacity
        );
        self.pages.push(finished.page);
    }

    fn page_full(&mut self) {
        self.transition(PaginatorState::PageFull);
        self.close_page();
        self.transition(PaginatorState::Placing);
    }

    fn forced_break(&mut self) {
        if self.cursor.is_fresh() {
            debug!("Forced break on empty page {} ignored", self.cursor.page.number);
            return;
        }
        self.transition(PaginatorState::ForcedBreak);
        self.close_page();
        self.transition(PaginatorState::Placing);
    }

    fn place(&mut self, laid: LaidOut) {
        if laid.slabs.is_empty() {
            return;
        }
        self.cursor.space(laid.space_before);
        let space_after = laid.space_after;

        match laid.placement {
            Placement::Flow => self.place_lines(laid.slabs),
            Placement::Keep => self.place_kept(laid.slabs),
            Placement::Rows { header } => self.place_rows(laid.slabs, header),
        }

        self.cursor.space(space_after);
    }

    /// Split between any two slabs.
    fn place_lines(&mut self, slabs: Vec<Slab>) {
        for slab in slabs {
            if !self.cursor.fits(slab.height) && !self.cursor.is_fresh() {
                self.page_full();
            }
            if !self.cursor.fits(slab.height) {
                warn!(
                    "Line of {:.1}pt overflows page {} ({:.1}pt available)",
                    slab.height,
                    self.cursor.page.number,
                    self.cursor.remaining()
                );
            }
            self.cursor.place(slab);
        }
    }

    /// Keep together; split by lines only if taller than a fresh page.
    fn place_kept(&mut self, slabs: Vec<Slab>) {
        let total: f64 = slabs.iter().map(|s| s.height).sum();
        if self.cursor.fits(total) {
            slabs.into_iter().for_each(|slab| self.cursor.place(slab));
            return;
        }
        if total <= self.cursor.capacity + EPSILON {
            self.page_full();
            slabs.into_iter().for_each(|slab| self.cursor.place(slab));
            return;
        }
        debug!("Block of {:.1}pt is taller than a page, splitting by lines", total);
        self.place_lines(slabs);
    }

    /// Split at row boundaries, reprinting the header on each new page.
    fn place_rows(&mut self, rows: Vec<Slab>, header: Option<Slab>) {
        let header_height = header.as_ref().map_or(0.0, |h| h.height);
        let mut need_header = header.is_some();

        for row in rows {
            let pending = if need_header { header_height } else { 0.0 };
            // A header is never left alone at the bottom of a page
            if !self.cursor.fits(pending + row.height) && !self.cursor.is_fresh() {
                self.page_full();
                need_header = header.is_some();
            }
            if need_header {
                if let Some(header) = &header {
                    self.cursor.place(header.clone());
                }
                need_header = false;
            }
            if !self.cursor.fits(row.height) {
                warn!(
                    "Table row of {:.1}pt does not fit page {}, placing it whole",
                    row.height, self.cursor.page.number
                );
            }
            self.cursor.place(row);
        }
    }
}

/// Paginate `blocks` with `config`.
pub fn paginate(blocks: &[Block], config: &ReportConfig) -> Vec<Page> {
    Paginator::new(config).paginate(blocks)
}

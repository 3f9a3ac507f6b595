//! Generic filter+sort projection over a keyed base collection.
//!
//! A `LiveView` owns a snapshot of its base items and keeps `items()` equal
//! to `sort(filter(base, search predicate), comparator)` after every
//! operation. The search predicate is fixed in shape: the term is split on
//! whitespace and an item passes when every token is a case-insensitive
//! substring of its display text (AND across tokens, no OR). Changed base
//! items are pushed in through [`insert_or_update`](LiveView::insert_or_update)
//! or [`rebuild`](LiveView::rebuild); [`refresh`](LiveView::refresh)
//! re-evaluates predicate and order without touching membership.

use std::cmp::Ordering;
use std::hash::Hash;

use hashbrown::HashMap;

pub struct LiveView<T, K> {
    base: HashMap<K, T>,
    visible: Vec<T>,
    terms: Vec<String>,
    key_of: Box<dyn Fn(&T) -> K>,
    text_of: Box<dyn Fn(&T) -> String>,
    order: Box<dyn Fn(&T, &T) -> Ordering>,
}

impl<T: Clone, K: Eq + Hash + Clone> LiveView<T, K> {
    /// `order` must be a total order; multi-key comparators break their
    /// ties explicitly so two distinct items never compare equal.
    pub fn new(
        key_of: impl Fn(&T) -> K + 'static,
        text_of: impl Fn(&T) -> String + 'static,
        order: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Self {
        Self {
            base: HashMap::new(),
            visible: Vec::new(),
            terms: Vec::new(),
            key_of: Box::new(key_of),
            text_of: Box::new(text_of),
            order: Box::new(order),
        }
    }

    fn matches(&self, item: &T) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let text = (self.text_of)(item).to_lowercase();
        self.terms.iter().all(|term| text.contains(term.as_str()))
    }

    fn visible_position(&self, key: &K) -> Option<usize> {
        self.visible.iter().position(|item| (self.key_of)(item) == *key)
    }

    /// Insert a new item or replace the one sharing its key, keeping the
    /// visible sequence filtered and ordered.
    pub fn insert_or_update(&mut self, item: T) {
        let key = (self.key_of)(&item);
        if let Some(pos) = self.visible_position(&key) {
            self.visible.remove(pos);
        }
        if self.matches(&item) {
            let at = self
                .visible
                .binary_search_by(|probe| (self.order)(probe, &item))
                .unwrap_or_else(|insert_at| insert_at);
            self.visible.insert(at, item.clone());
        }
        self.base.insert(key, item);
    }

    pub fn remove(&mut self, key: &K) {
        if self.base.remove(key).is_some() {
            if let Some(pos) = self.visible_position(key) {
                self.visible.remove(pos);
            }
        }
    }

    /// Tokenize `term` on whitespace (empty tokens dropped) and re-evaluate
    /// the whole base.
    pub fn set_search_term(&mut self, term: &str) {
        self.terms = term.split_whitespace().map(str::to_lowercase).collect();
        self.refresh();
    }

    /// Full predicate re-evaluation and re-sort with no membership change.
    pub fn refresh(&mut self) {
        let mut visible: Vec<T> = self
            .base
            .values()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        visible.sort_by(|a, b| (self.order)(a, b));
        self.visible = visible;
    }

    /// Replace the base wholesale (dataset load, bulk tag operations).
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = T>) {
        self.base = items
            .into_iter()
            .map(|item| ((self.key_of)(&item), item))
            .collect();
        self.refresh();
    }

    pub fn items(&self) -> &[T] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.visible.get(index)
    }

    pub fn position_of(&self, key: &K) -> Option<usize> {
        self.visible_position(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.visible_position(key).is_some()
    }

    pub fn search_term(&self) -> String {
        self.terms.join(" ")
    }

    pub fn base_len(&self) -> usize {
        self.base.len()
    }
}

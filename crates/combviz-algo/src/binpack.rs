//! Offline bin-packing heuristics over unit-capacity bins.
//!
//! Input is a list of `(size, quantity)` pairs which is expanded into a flat
//! sequence before packing. Every placed [`BinElement`] remembers its position
//! in that expanded sequence, also for the decreasing variants which sort it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Slack allowed on the unit capacity, absorbing float accumulation error.
pub const FILL_TOLERANCE: f64 = 1e-9;

/// A size with a multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinItem {
    pub size: f64,
    #[serde(default = "one")]
    pub quantity: usize,
}

fn one() -> usize {
    1
}

impl BinItem {
    pub fn new(size: f64, quantity: usize) -> Self {
        BinItem { size, quantity }
    }
}

/// One element placed into a bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinElement {
    pub size: f64,
    /// Position in the expanded, unsorted input.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bin {
    pub fill_rate: f64,
    pub elements: Vec<BinElement>,
}

impl Bin {
    fn with(element: BinElement) -> Self {
        Bin {
            fill_rate: element.size,
            elements: vec![element],
        }
    }

    fn fits(&self, size: f64) -> bool {
        self.fill_rate + size <= 1.0 + FILL_TOLERANCE
    }

    fn place(&mut self, element: BinElement) {
        self.fill_rate += element.size;
        self.elements.push(element);
    }
}

/// Which heuristic [`pack`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinPackStrategy {
    NextFit,
    FirstFit,
    FirstFitDecreasing,
    NextFitDecreasing,
}

impl BinPackStrategy {
    pub const ALL: [BinPackStrategy; 4] = [
        BinPackStrategy::NextFit,
        BinPackStrategy::FirstFit,
        BinPackStrategy::FirstFitDecreasing,
        BinPackStrategy::NextFitDecreasing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BinPackStrategy::NextFit => "next-fit",
            BinPackStrategy::FirstFit => "first-fit",
            BinPackStrategy::FirstFitDecreasing => "first-fit-decreasing",
            BinPackStrategy::NextFitDecreasing => "next-fit-decreasing",
        }
    }
}

impl fmt::Display for BinPackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinPackStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinPackStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = BinPackStrategy::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown strategy '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Runs `strategy` over `items`.
pub fn pack(strategy: BinPackStrategy, items: &[BinItem]) -> Vec<Bin> {
    let bins = match strategy {
        BinPackStrategy::NextFit => next_fit(items),
        BinPackStrategy::FirstFit => first_fit(items),
        BinPackStrategy::FirstFitDecreasing => first_fit_decreasing(items),
        BinPackStrategy::NextFitDecreasing => next_fit_decreasing(items),
    };
    tracing::debug!(
        strategy = %strategy,
        elements = bins.iter().map(|b| b.elements.len()).sum::<usize>(),
        bins = bins.len(),
        "packed"
    );
    bins
}

/// Flattens `(size, quantity)` pairs, numbering elements in input order.
pub fn expand(items: &[BinItem]) -> Vec<BinElement> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat(item.size).take(item.quantity))
        .enumerate()
        .map(|(index, size)| BinElement { size, index })
        .collect()
}

/// Sum of all expanded sizes.
pub fn total_size(items: &[BinItem]) -> f64 {
    items.iter().map(|item| item.size * item.quantity as f64).sum()
}

pub fn next_fit(items: &[BinItem]) -> Vec<Bin> {
    next_fit_elements(expand(items))
}

pub fn first_fit(items: &[BinItem]) -> Vec<Bin> {
    first_fit_elements(expand(items))
}

pub fn first_fit_decreasing(items: &[BinItem]) -> Vec<Bin> {
    first_fit_elements(decreasing(expand(items)))
}

pub fn next_fit_decreasing(items: &[BinItem]) -> Vec<Bin> {
    next_fit_elements(decreasing(expand(items)))
}

// Stable, so equal sizes keep their input order.
fn decreasing(mut elements: Vec<BinElement>) -> Vec<BinElement> {
    elements.sort_by(|a, b| b.size.total_cmp(&a.size));
    elements
}

fn next_fit_elements(elements: Vec<BinElement>) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    for element in elements {
        match bins.last_mut() {
            Some(open) if open.fits(element.size) => open.place(element),
            _ => bins.push(Bin::with(element)),
        }
    }
    bins
}

fn first_fit_elements(elements: Vec<BinElement>) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    for element in elements {
        match bins.iter_mut().find(|bin| bin.fits(element.size)) {
            Some(bin) => bin.place(element),
            None => bins.push(Bin::with(element)),
        }
    }
    bins
}

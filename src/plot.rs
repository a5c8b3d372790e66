//! Compare text-layout reports and chart the per-character cost.
//!
//! Each report becomes one [`ResultSet`]. Only languages present in every set
//! are compared; rows are ordered by the first set's per-character time,
//! slowest first. A set that is slower than the one before it for a language
//! is flagged as a regression and drawn in red.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, SwashCache};
use quick_xml::events::Event;
use quick_xml::Reader;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use crate::error::{BenchError, Result};

/// Languages with fewer laid-out strings than this are too noisy to compare.
pub const DEFAULT_MIN_STRINGS: u64 = 400_000;

const ROOT_ELEMENT: &str = "pango-benchmark";

#[derive(Clone, Debug, PartialEq)]
pub struct LanguageTiming {
    pub name: String,
    pub total_time: f64,
    pub num_strings: u64,
    pub num_chars: u64,
}

impl LanguageTiming {
    pub fn char_time(&self) -> f64 {
        self.total_time / self.num_chars as f64
    }
}

#[derive(Default)]
struct PartialLanguage {
    name: Option<String>,
    elapsed: Option<f64>,
    total_strings: Option<u64>,
    total_chars: Option<u64>,
}

impl PartialLanguage {
    fn complete(self) -> Option<LanguageTiming> {
        Some(LanguageTiming {
            name: self.name?,
            total_time: self.elapsed?,
            num_strings: self.total_strings?,
            num_chars: self.total_chars?,
        })
    }
}

/// One parsed report.
#[derive(Clone, Debug, Default)]
pub struct ResultSet {
    pub name: String,
    pub languages: BTreeMap<String, LanguageTiming>,
}

impl ResultSet {
    pub fn load(path: &Path, min_strings: u64) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|e| BenchError::read(path, e))?;
        Self::parse(&xml, path, min_strings)
    }

    /// `source` names the set until a `<name>` element overrides it.
    pub fn parse(xml: &str, source: &Path, min_strings: u64) -> Result<Self> {
        let malformed = |reason: String| BenchError::MalformedReport {
            path: source.to_path_buf(),
            reason,
        };

        let mut reader = Reader::from_str(xml);
        let mut set = ResultSet {
            name: source.display().to_string(),
            languages: BTreeMap::new(),
        };
        let mut stack: Vec<String> = Vec::new();
        let mut saw_root = false;
        let mut current: Option<PartialLanguage> = None;

        loop {
            match reader.read_event().map_err(|e| malformed(e.to_string()))? {
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if stack.is_empty() {
                        if tag != ROOT_ELEMENT {
                            return Err(malformed(format!("top-level element is <{tag}>, expected <{ROOT_ELEMENT}>")));
                        }
                        saw_root = true;
                    } else if stack.len() == 1 && tag == "language" {
                        current = Some(PartialLanguage::default());
                    }
                    stack.push(tag);
                }
                Event::End(_) => {
                    let closed = stack.pop();
                    if stack.len() == 1 && closed.as_deref() == Some("language") {
                        set.add_language(current.take(), min_strings);
                    }
                }
                Event::Text(t) => {
                    let raw = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    let text = raw.trim();
                    if text.is_empty() {
                        continue;
                    }
                    match (stack.len(), stack.last().map(String::as_str)) {
                        (2, Some("name")) => set.name = text.to_string(),
                        (3, Some(field)) => {
                            let Some(lang) = current.as_mut() else {
                                continue;
                            };
                            let bad = |what: &str| malformed(format!("bad <{what}> value {text:?}"));
                            match field {
                                "name" => lang.name = Some(text.to_string()),
                                "elapsed" => lang.elapsed = Some(text.parse().map_err(|_| bad(field))?),
                                "total_strings" => {
                                    lang.total_strings = Some(text.parse().map_err(|_| bad(field))?)
                                }
                                "total_chars" => {
                                    lang.total_chars = Some(text.parse().map_err(|_| bad(field))?)
                                }
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(malformed(format!("no <{ROOT_ELEMENT}> element")));
        }
        Ok(set)
    }

    fn add_language(&mut self, partial: Option<PartialLanguage>, min_strings: u64) {
        let Some(lang) = partial.and_then(PartialLanguage::complete) else {
            tracing::warn!(set = %self.name, "skipping incomplete <language> record");
            return;
        };
        if lang.num_chars == 0 || lang.num_strings < min_strings {
            tracing::debug!(language = %lang.name, strings = lang.num_strings, "below threshold");
            return;
        }
        self.languages.insert(lang.name.clone(), lang);
    }
}

/// Languages present in every set, sorted by name.
pub fn common_languages(sets: &[ResultSet]) -> Vec<String> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    let mut common: BTreeSet<&String> = first.languages.keys().collect();
    for set in rest {
        common.retain(|name| set.languages.contains_key(*name));
    }
    common.into_iter().cloned().collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub language: String,
    /// Seconds per character, one entry per set.
    pub char_times: Vec<f64>,
    /// `true` where a set is slower than the set before it.
    pub regressions: Vec<bool>,
}

pub fn compare(sets: &[ResultSet]) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = common_languages(sets)
        .into_iter()
        .map(|language| {
            let char_times: Vec<f64> = sets
                .iter()
                .map(|s| s.languages[&language].char_time())
                .collect();
            let regressions = (0..char_times.len())
                .map(|i| i > 0 && char_times[i - 1] < char_times[i])
                .collect();
            ComparisonRow {
                language,
                char_times,
                regressions,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.char_times[0].total_cmp(&a.char_times[0]));
    rows
}

pub fn write_table<W: Write>(sets: &[ResultSet], rows: &[ComparisonRow], w: &mut W) -> io::Result<()> {
    for (i, set) in sets.iter().enumerate() {
        writeln!(w, "[{i}] {}", set.name)?;
    }
    write!(w, "{:<8}", "Lang")?;
    for i in 0..sets.len() {
        write!(w, " {:>14}", format!("[{i}] us/char"))?;
    }
    writeln!(w)?;
    for row in rows {
        write!(w, "{:<8}", row.language)?;
        for (t, slower) in row.char_times.iter().zip(&row.regressions) {
            let mark = if *slower { "!" } else { " " };
            write!(w, " {:>13.4}{mark}", t * 1e6)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct PlotConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub min_strings: u64,
}

impl PlotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(BenchError::InvalidConfig("at least one input report is required".into()));
        }
        Ok(())
    }

    pub fn load_sets(&self) -> Result<Vec<ResultSet>> {
        self.validate()?;
        self.inputs
            .iter()
            .map(|p| ResultSet::load(p, self.min_strings))
            .collect()
    }
}

/// Chart geometry, in pixels.
#[derive(Clone, Copy, Debug)]
pub struct PlotLayout {
    pub swatch_size: f32,
    pub lang_column_width: f32,
    pub header_height: f32,
    pub bar_height: f32,
    pub row_spacing: f32,
    pub bar_length: f32,
    pub label_size: f32,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            swatch_size: 12.0,
            lang_column_width: 40.0,
            header_height: 20.0,
            bar_height: 6.0,
            row_spacing: 6.0,
            bar_length: 400.0,
            label_size: 10.0,
        }
    }
}

const REGRESSION_LEGEND: &str = "Timing should be lower than preceding one, but it isn't";
const LANG_HEADER: &str = "Lang";
const TIME_HEADER: &str = "Avg. time per character";

const FIRST_SET_COLOR: [f32; 3] = [0.0, 0.0, 0.36];
const LAST_SET_COLOR: [f32; 3] = [0.64, 0.64, 0.78];
const REGRESSION_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
const TEXT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

fn set_color(index: usize, count: usize) -> [f32; 3] {
    if count <= 1 {
        return FIRST_SET_COLOR;
    }
    let f = index as f32 / (count - 1) as f32;
    [0, 1, 2].map(|c| FIRST_SET_COLOR[c] + f * (LAST_SET_COLOR[c] - FIRST_SET_COLOR[c]))
}

fn paint(rgb: [f32; 3]) -> Paint<'static> {
    let mut paint = Paint::default();
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    paint.set_color_rgba8(r, g, b, 255);
    paint
}

fn fill(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, rgb: [f32; 3]) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &paint(rgb), Transform::identity(), None);
    }
}

/// Lays out labels with `cosmic-text` and rasterizes the glyphs into a pixmap.
pub struct TextPainter {
    font_system: FontSystem,
    cache: SwashCache,
    metrics: Metrics,
}

impl TextPainter {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: SwashCache::new(),
            metrics: Metrics::new(font_size, (font_size * 1.2).ceil()),
        }
    }

    /// Draw `text` with its line box starting at `(x, y)`. Anything outside the
    /// pixmap is clipped.
    pub fn draw(&mut self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, rgb: [f32; 3]) {
        let mut buffer = Buffer::new(&mut self.font_system, self.metrics);
        buffer.set_text(&mut self.font_system, text, Attrs::new(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let base = cosmic_text::Color::rgb(r, g, b);
        buffer.draw(&mut self.font_system, &mut self.cache, base, |gx, gy, w, h, color| {
            if color.a() == 0 {
                return;
            }
            let Some(rect) = Rect::from_xywh(x + gx as f32, y + gy as f32, w as f32, h as f32) else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        });
    }
}

impl PlotLayout {
    pub fn size(&self, num_sets: usize, num_languages: usize) -> (u32, u32) {
        let width = self.lang_column_width + self.bar_length;
        // One heading per set, one for the regression legend, one column header.
        let height = self.header_height * (num_sets as f32 + 2.0)
            + num_languages as f32 * (num_sets as f32 * self.bar_height + self.row_spacing);
        (width.ceil() as u32, height.ceil() as u32)
    }

    /// Draw the legend, the column header and one bar per set for every row.
    ///
    /// `set_names` labels the legend swatches, one per set.
    pub fn render(&self, set_names: &[&str], rows: &[ComparisonRow], text: &mut TextPainter) -> Result<Pixmap> {
        let num_sets = set_names.len();
        let (width, height) = self.size(num_sets, rows.len());
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| BenchError::Render {
            what: "plot",
            reason: format!("cannot allocate a {width}x{height} surface"),
        })?;
        pixmap.fill(Color::WHITE);

        let label_x = self.swatch_size + self.swatch_size / 2.0;
        let mut y = 0.0;
        for (i, name) in set_names.iter().enumerate() {
            fill(&mut pixmap, 0.0, y, self.swatch_size, self.swatch_size, set_color(i, num_sets));
            text.draw(&mut pixmap, name, label_x, y, TEXT_COLOR);
            y += self.header_height;
        }
        fill(&mut pixmap, 0.0, y, self.swatch_size, self.swatch_size, REGRESSION_COLOR);
        text.draw(&mut pixmap, REGRESSION_LEGEND, label_x, y, TEXT_COLOR);
        y += self.header_height;

        text.draw(&mut pixmap, LANG_HEADER, 0.0, y, TEXT_COLOR);
        text.draw(&mut pixmap, TIME_HEADER, self.lang_column_width, y, TEXT_COLOR);
        y += self.header_height;

        let max_time = rows
            .iter()
            .flat_map(|r| r.char_times.iter().copied())
            .fold(0.0f64, f64::max);

        for row in rows {
            text.draw(&mut pixmap, &row.language, 0.0, y, TEXT_COLOR);
            for (i, (t, slower)) in row.char_times.iter().zip(&row.regressions).enumerate() {
                let factor = if max_time > 0.0 { (t / max_time) as f32 } else { 0.0 };
                let rgb = if *slower { REGRESSION_COLOR } else { set_color(i, num_sets) };
                fill(
                    &mut pixmap,
                    self.lang_column_width,
                    y,
                    self.bar_length * factor,
                    self.bar_height,
                    rgb,
                );
                y += self.bar_height;
            }
            y += self.row_spacing;
        }
        Ok(pixmap)
    }
}

pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<()> {
    pixmap.save_png(path).map_err(|e| BenchError::Render {
        what: "plot",
        reason: format!("{}: {e}", path.display()),
    })
}

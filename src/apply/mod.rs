use crate::dom::{DomError, DomTree};
use crate::filter::{FilterChain, SVG_CONTAINER_ID};
use crate::media::{MediaElement, MediaKind, MediaLocator};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
}

/// Writes filter chains onto located media and owns the single SVG
/// definition node.
#[derive(Debug, Default)]
pub struct FilterApplier {
    last_chain: Option<FilterChain>,
}

impl FilterApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_chain(&self) -> Option<&FilterChain> {
        self.last_chain.as_ref()
    }

    pub fn apply<D: DomTree + ?Sized>(
        &mut self,
        dom: &mut D,
        locator: &MediaLocator,
        settings: &Settings,
    ) -> ApplyReport {
        let chain = FilterChain::from_settings(settings);
        // Delete before create so repeated passes never stack definitions.
        dom.remove_by_id(SVG_CONTAINER_ID);
        if let Some(advanced) = &chain.advanced {
            if let Err(err) = dom.insert_markup(SVG_CONTAINER_ID, &advanced.to_markup()) {
                tracing::warn!(?err, "failed to insert advanced filter definition");
            }
        }

        let css = chain.css_value();
        let mut report = ApplyReport::default();
        for element in locator.locate(dom, true) {
            // Images filtered before the flag was turned off get cleared.
            if element.kind == MediaKind::Image && !settings.work_on_images {
                if let Err(err) = dom.set_style_filter(element.node, None) {
                    tracing::debug!(?err, node = ?element.node, "skipping image clear");
                }
                continue;
            }
            match write_element(dom, element, Some(&css), settings.speed) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::debug!(?err, node = ?element.node, "skipping media element");
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(
            applied = report.applied,
            skipped = report.skipped,
            advanced = chain.advanced.is_some(),
            "applied filter chain"
        );
        self.last_chain = Some(chain);
        report
    }

    /// Clears every located element and the SVG definition. Safe to call
    /// repeatedly.
    pub fn remove_filters<D: DomTree + ?Sized>(
        &mut self,
        dom: &mut D,
        locator: &MediaLocator,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for element in locator.locate(dom, true) {
            match write_element(dom, element, None, 1.0) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::debug!(?err, node = ?element.node, "skipping media element");
                    report.skipped += 1;
                }
            }
        }
        dom.remove_by_id(SVG_CONTAINER_ID);
        self.last_chain = None;
        tracing::debug!(cleared = report.applied, "removed filters");
        report
    }
}

fn write_element<D: DomTree + ?Sized>(
    dom: &mut D,
    element: MediaElement,
    css: Option<&str>,
    speed: f64,
) -> Result<(), DomError> {
    dom.set_style_filter(element.node, css)?;
    if element.kind == MediaKind::Video {
        dom.set_playback_rate(element.node, speed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn page_with_videos(count: usize) -> (MemoryDom, Vec<crate::dom::NodeId>) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let videos = (0..count).map(|_| dom.append(body, "video")).collect();
        (dom, videos)
    }

    #[test]
    fn apply_writes_css_chain_and_speed() {
        let (mut dom, videos) = page_with_videos(2);
        let locator = MediaLocator::new();
        let mut applier = FilterApplier::new();
        let settings = Settings {
            brightness: 20.0,
            contrast: -10.0,
            speed: 1.5,
            ..Settings::default()
        };

        let report = applier.apply(&mut dom, &locator, &settings);

        assert_eq!(report.applied, 2);
        for video in videos {
            assert_eq!(
                dom.style_filter(video),
                Some("brightness(1.2) contrast(0.9) saturate(1)")
            );
            assert_eq!(dom.playback_rate(video), Some(1.5));
        }
        assert!(!dom.contains_id(SVG_CONTAINER_ID));
    }

    #[test]
    fn repeated_applies_keep_one_svg_definition() {
        let (mut dom, _) = page_with_videos(1);
        let locator = MediaLocator::new();
        let mut applier = FilterApplier::new();
        let mut settings = Settings {
            gamma: 1.4,
            ..Settings::default()
        };

        for gamma in [1.4, 1.6, 2.0] {
            settings.gamma = gamma;
            applier.apply(&mut dom, &locator, &settings);
        }

        assert_eq!(dom.count_id(SVG_CONTAINER_ID), 1);
        let markup = dom.markup(SVG_CONTAINER_ID).expect("definition should exist");
        assert!(markup.contains("exponent=\"2\""));

        settings.gamma = 1.0;
        applier.apply(&mut dom, &locator, &settings);
        assert_eq!(dom.count_id(SVG_CONTAINER_ID), 0);
    }

    #[test]
    fn detached_elements_do_not_stop_the_pass() {
        let (mut dom, videos) = page_with_videos(3);
        dom.detach(videos[1]);
        let locator = MediaLocator::new();
        let mut applier = FilterApplier::new();

        let report = applier.apply(&mut dom, &locator, &Settings::default());

        assert_eq!(report, ApplyReport { applied: 2, skipped: 1 });
        assert!(dom.style_filter(videos[0]).is_some());
        assert!(dom.style_filter(videos[1]).is_none());
        assert!(dom.style_filter(videos[2]).is_some());
    }

    #[test]
    fn images_are_filtered_only_when_enabled() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let image = dom.append(body, "img");
        let locator = MediaLocator::new();
        let mut applier = FilterApplier::new();
        let mut settings = Settings::default();

        applier.apply(&mut dom, &locator, &settings);
        assert!(dom.style_filter(image).is_none());

        settings.work_on_images = true;
        applier.apply(&mut dom, &locator, &settings);
        assert!(dom.style_filter(image).is_some());
        assert_eq!(dom.playback_rate(image), Some(1.0));

        settings.work_on_images = false;
        let report = applier.apply(&mut dom, &locator, &settings);
        assert!(dom.style_filter(image).is_none());
        assert_eq!(report, ApplyReport::default());
    }

    #[test]
    fn remove_filters_is_idempotent() {
        let (mut dom, videos) = page_with_videos(1);
        let locator = MediaLocator::new();
        let mut applier = FilterApplier::new();
        let settings = Settings {
            sharpness: 40.0,
            speed: 2.0,
            ..Settings::default()
        };
        applier.apply(&mut dom, &locator, &settings);

        applier.remove_filters(&mut dom, &locator);
        let once = (
            dom.style_filter(videos[0]).map(str::to_string),
            dom.playback_rate(videos[0]),
            dom.count_id(SVG_CONTAINER_ID),
        );
        applier.remove_filters(&mut dom, &locator);
        let twice = (
            dom.style_filter(videos[0]).map(str::to_string),
            dom.playback_rate(videos[0]),
            dom.count_id(SVG_CONTAINER_ID),
        );

        assert_eq!(once, (None, Some(1.0), 0));
        assert_eq!(once, twice);
        assert!(applier.last_chain().is_none());
    }
}

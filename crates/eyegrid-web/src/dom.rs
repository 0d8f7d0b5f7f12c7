//! `Surface` backed by real DOM nodes under `.wrap`.
//!
//! Each eye is `div.eye > div.pupil + div.lid`; the stylesheet centers the
//! pupil, so offsets are written as a plain translate. Batches are assembled
//! in a `DocumentFragment` and attached with one append.

use eyegrid::{CellId, Easing, EyeCell, EyeRect, GridFit, Surface, SurfaceError, Viewport};
use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

fn host(err: JsValue) -> SurfaceError {
    SurfaceError::Host(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Eye rect from the on-screen center and the untransformed layout sizes.
///
/// Bounding rects include CSS transforms (unrevealed eyes are scaled down), so
/// only their center is used; sizes come from `offsetWidth`/`offsetHeight`.
fn layout_rect(screen_center: Vec2, eye_size: Vec2, pupil_size: Vec2) -> EyeRect {
    EyeRect {
        origin: screen_center - eye_size / 2.0,
        size: eye_size,
        pupil: pupil_size,
    }
}

fn offset_size(el: &HtmlElement) -> Vec2 {
    Vec2::new(el.offset_width() as f32, el.offset_height() as f32)
}

fn html(el: Element) -> Result<HtmlElement, JsValue> {
    el.dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("element is not an HtmlElement"))
}

struct EyeNodes {
    eye: HtmlElement,
    pupil: HtmlElement,
    lid: HtmlElement,
}

pub struct DomSurface {
    document: Document,
    wrap: HtmlElement,
    loader: Option<Element>,
    header: Option<HtmlElement>,
    footer: Option<HtmlElement>,
    eyes: Vec<EyeNodes>,
}

impl DomSurface {
    /// Bind to the page. Fails if there is no document or no `.wrap` container.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let wrap = document
            .query_selector(".wrap")?
            .ok_or_else(|| JsValue::from_str("missing .wrap container"))?;
        let wrap = html(wrap)?;
        let loader = document.get_element_by_id("loader");
        let header = document.get_element_by_id("siteHeader").and_then(|e| html(e).ok());
        let footer = document.get_element_by_id("siteFooter").and_then(|e| html(e).ok());
        if loader.is_none() {
            log::debug!("no #loader element on the page");
        }
        Ok(Self { document, wrap, loader, header, footer, eyes: Vec::new() })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Window size plus header/footer heights.
    pub fn read_viewport(&self) -> Viewport {
        let (width, height) = web_sys::window()
            .map(|w| {
                let iw = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let ih = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                (iw as f32, ih as f32)
            })
            .unwrap_or((0.0, 0.0));
        let header = self.header.as_ref().map(|h| h.offset_height() as f32).unwrap_or(0.0);
        let footer = self.footer.as_ref().map(|f| f.offset_height() as f32).unwrap_or(0.0);
        Viewport::new(width, height).with_chrome(header, footer)
    }

    fn nodes(&self, id: CellId) -> Result<&EyeNodes, SurfaceError> {
        self.eyes.get(id.index()).ok_or(SurfaceError::MissingCell(id))
    }

    fn div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let el = self.document.create_element("div")?;
        el.set_class_name(class);
        html(el)
    }

    fn create_eye(&self, cell: &EyeCell) -> Result<EyeNodes, JsValue> {
        let eye = self.div("eye")?;
        let pupil = self.div("pupil")?;
        let lid = self.div("lid")?;
        eye.set_attribute("data-row", &cell.row.to_string())?;
        eye.set_attribute("data-col", &cell.col.to_string())?;
        eye.append_child(&pupil)?;
        eye.append_child(&lid)?;
        Ok(EyeNodes { eye, pupil, lid })
    }
}

impl Surface for DomSurface {
    fn backend(&self) -> &'static str {
        "dom"
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.wrap.set_inner_html("");
        self.eyes.clear();
        Ok(())
    }

    fn set_layout(&mut self, fit: &GridFit) -> Result<(), SurfaceError> {
        if let Some(root) = self.document.document_element() {
            let root = html(root).map_err(host)?;
            root.style()
                .set_property("--eye-size", &format!("{}px", fit.cell_px))
                .map_err(host)?;
        }
        let style = self.wrap.style();
        style.set_property("--cols", &fit.cols.to_string()).map_err(host)?;
        style.set_property("--side-pairs", &fit.side_pairs.to_string()).map_err(host)?;
        Ok(())
    }

    fn create_cells(&mut self, cells: &[EyeCell]) -> Result<(), SurfaceError> {
        let frag = self.document.create_document_fragment();
        let mut made = Vec::with_capacity(cells.len());
        for cell in cells {
            let nodes = self.create_eye(cell).map_err(host)?;
            frag.append_child(&nodes.eye).map_err(host)?;
            made.push(nodes);
        }
        self.wrap.append_child(&frag).map_err(host)?;
        self.eyes.extend(made);
        Ok(())
    }

    fn measure(&self, id: CellId) -> Result<EyeRect, SurfaceError> {
        let nodes = self.nodes(id)?;
        let bounds = nodes.eye.get_bounding_client_rect();
        let center = Vec2::new(
            (bounds.left() + bounds.width() / 2.0) as f32,
            (bounds.top() + bounds.height() / 2.0) as f32,
        );
        Ok(layout_rect(center, offset_size(&nodes.eye), offset_size(&nodes.pupil)))
    }

    fn set_highlighted(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError> {
        self.nodes(id)?.eye.class_list().toggle_with_force("yellow", on).map_err(host)?;
        Ok(())
    }

    fn set_revealed(&mut self, id: CellId, on: bool) -> Result<(), SurfaceError> {
        self.nodes(id)?.eye.class_list().toggle_with_force("revealed", on).map_err(host)?;
        Ok(())
    }

    fn set_pupil(&mut self, id: CellId, offset: Vec2) -> Result<(), SurfaceError> {
        self.nodes(id)?
            .pupil
            .style()
            .set_property("transform", &format!("translate({:.2}px, {:.2}px)", offset.x, offset.y))
            .map_err(host)
    }

    fn set_lid(&mut self, id: CellId, coverage: f32, duration_ms: f64, easing: Easing) -> Result<(), SurfaceError> {
        let style = self.nodes(id)?.lid.style();
        style
            .set_property("transition", &format!("height {}ms {}", duration_ms.round(), easing.css()))
            .map_err(host)?;
        style
            .set_property("height", &format!("{}%", (coverage.clamp(0.0, 1.0) * 100.0).round()))
            .map_err(host)
    }

    fn hide_loader(&mut self) {
        if let Some(loader) = &self.loader {
            if let Err(err) = loader.class_list().add_1("hide") {
                log::warn!("could not hide loader: {:?}", err);
            }
        }
    }

    fn show_loader(&mut self) {
        if let Some(loader) = &self.loader {
            if let Err(err) = loader.class_list().remove_1("hide") {
                log::warn!("could not show loader: {:?}", err);
            }
        }
    }
}

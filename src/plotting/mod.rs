pub mod canvas;
pub mod chart;
pub mod library;
pub mod styles;

#[cfg(test)]
mod tests;

pub use canvas::CanvasRenderer;
pub use chart::{
    Chart, ChartData, ChartError, ChartKind, ChartRenderer, ChartTarget, Mark, RendererKind,
    Series, Surface, SurfaceContent, Surfaces, ValueAxis, ValueFormat,
};
pub use library::LibraryRenderer;
pub use styles::{ChartStyle, ChartTheme};

/// Build the renderer selected by configuration.
pub fn renderer_for(kind: RendererKind, theme: ChartTheme) -> Box<dyn ChartRenderer> {
    match kind {
        RendererKind::Library => Box::new(LibraryRenderer::new(theme)),
        RendererKind::Canvas => Box::new(CanvasRenderer::new(theme)),
    }
}

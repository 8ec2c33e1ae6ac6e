//! Original and annotated image regions

use review_core::view::ImagePanel;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ImagePanelProps {
    pub panel: ImagePanel,
    pub alt: AttrValue,
    /// Show the annotation colour legend under the image
    #[prop_or_default]
    pub legend: bool,
}

#[function_component(ImagePanelView)]
pub fn image_panel_view(props: &ImagePanelProps) -> Html {
    match &props.panel {
        ImagePanel::Placeholder(copy) => html! { <p class="text-muted">{ *copy }</p> },
        ImagePanel::Unavailable(copy) => html! { <p class="text-danger">{ *copy }</p> },
        ImagePanel::Jpeg(_) => html! {
            <div class="img-container">
                <img src={props.panel.data_uri()} alt={props.alt.clone()} class="img-fluid" />
                if props.legend {
                    <div class="image-legend mt-3">
                        <div class="d-flex align-items-center mb-2">
                            <span class="legend-color-box" style="background-color: rgb(0, 255, 0);"></span>
                            <span class="ms-2">{ "Editable text (handwritten, not in template)" }</span>
                        </div>
                        <div class="d-flex align-items-center">
                            <span class="legend-color-box" style="background-color: rgb(255, 0, 0);"></span>
                            <span class="ms-2">{ "Non-editable text (printed, in template)" }</span>
                        </div>
                    </div>
                }
            </div>
        },
    }
}

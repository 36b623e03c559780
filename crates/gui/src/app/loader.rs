//! Background asset loading on a tokio runtime.
//!
//! Requests come from the tour; progress and results flow back over a
//! channel that the UI thread drains once per frame.

use glam::Vec3;
use tokio::sync::mpsc;
use walkthrough_lib::assets::{self, DecodedImage};
use walkthrough_lib::error::AssetError;
use walkthrough_lib::loading::{LoadRequest, LoadSlot, LoadTicket};

pub enum LoadEvent {
    Progress {
        ticket: LoadTicket,
        loaded: u64,
        total: Option<u64>,
    },
    Image {
        ticket: LoadTicket,
        reference: String,
        result: Result<egui::ColorImage, AssetError>,
    },
    Model {
        ticket: LoadTicket,
        result: Result<Vec<Vec3>, AssetError>,
    },
}

pub struct AssetLoader {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    tx: mpsc::UnboundedSender<LoadEvent>,
    rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl AssetLoader {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("asset-loader")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            client: reqwest::Client::new(),
            tx,
            rx,
        })
    }

    /// Fetch and decode `request` in the background.
    ///
    /// Every request ends in exactly one `Image` or `Model` event, even when
    /// the work task panics.
    pub fn start(&self, request: LoadRequest, ctx: egui::Context) {
        let tx = self.tx.clone();
        let client = self.client.clone();
        tracing::debug!("Loading {} ({:?})", request.reference, request.ticket.slot);

        let LoadRequest { ticket, reference } = request;
        let work = self.runtime.spawn(load(
            client,
            ticket,
            reference.clone(),
            tx.clone(),
            ctx.clone(),
        ));
        self.runtime.spawn(async move {
            let event = match work.await {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("Loader task for {reference} died: {e}");
                    failure(ticket, reference, AssetError::Task(e.to_string()))
                }
            };
            // The receiver only goes away with the app
            let _ = tx.send(event);
            ctx.request_repaint();
        });
    }

    /// Events that arrived since the last frame
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

async fn load(
    client: reqwest::Client,
    ticket: LoadTicket,
    reference: String,
    tx: mpsc::UnboundedSender<LoadEvent>,
    ctx: egui::Context,
) -> LoadEvent {
    let bytes = fetch(&client, &reference, ticket, &tx, &ctx).await;
    match ticket.slot {
        LoadSlot::Panorama => {
            let result = match bytes {
                Ok(bytes) => tokio::task::spawn_blocking(move || assets::decode_image(&bytes))
                    .await
                    .unwrap_or_else(|e| Err(AssetError::Task(e.to_string())))
                    .map(to_color_image),
                Err(e) => Err(e),
            };
            LoadEvent::Image {
                ticket,
                reference,
                result,
            }
        }
        LoadSlot::Model => LoadEvent::Model {
            ticket,
            result: bytes.and_then(|bytes| {
                assets::parse_obj_points(&reference, &String::from_utf8_lossy(&bytes))
            }),
        },
    }
}

fn failure(ticket: LoadTicket, reference: String, error: AssetError) -> LoadEvent {
    match ticket.slot {
        LoadSlot::Panorama => LoadEvent::Image {
            ticket,
            reference,
            result: Err(error),
        },
        LoadSlot::Model => LoadEvent::Model {
            ticket,
            result: Err(error),
        },
    }
}

async fn fetch(
    client: &reqwest::Client,
    reference: &str,
    ticket: LoadTicket,
    tx: &mpsc::UnboundedSender<LoadEvent>,
    ctx: &egui::Context,
) -> Result<Vec<u8>, AssetError> {
    let progress = |loaded: u64, total: Option<u64>| {
        let _ = tx.send(LoadEvent::Progress {
            ticket,
            loaded,
            total,
        });
        ctx.request_repaint();
    };

    if !assets::is_remote(reference) {
        let io_error = |source| AssetError::Io {
            reference: reference.to_string(),
            source,
        };
        let size = tokio::fs::metadata(reference).await.map_err(io_error)?.len();
        assets::check_download_size(reference, size)?;
        let bytes = tokio::fs::read(reference)
            .await
            .map_err(|source| AssetError::Io {
                reference: reference.to_string(),
                source,
            })?;
        let len = bytes.len() as u64;
        progress(len, Some(len));
        return Ok(bytes);
    }

    let mut response = client.get(reference).send().await?;
    if !response.status().is_success() {
        return Err(AssetError::Status {
            reference: reference.to_string(),
            status: response.status().as_u16(),
        });
    }
    let total = response.content_length();
    if let Some(total) = total {
        assets::check_download_size(reference, total)?;
    }
    let mut bytes = Vec::with_capacity(assets::preallocation(total));
    while let Some(chunk) = response.chunk().await? {
        assets::check_download_size(reference, (bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
        progress(bytes.len() as u64, total);
    }
    Ok(bytes)
}

fn to_color_image(image: DecodedImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [image.width as usize, image.height as usize],
        &image.rgba,
    )
}

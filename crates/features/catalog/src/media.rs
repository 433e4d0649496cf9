//! Logos and screenshots.

use crate::error::{CatalogError, invalid};
use crate::model::{Project, ProjectImage};
use crate::projects::ensure_editor;
use crate::{CatalogInner, blocking, discard};
use chrono::Utc;
use image::{GenericImageView, ImageFormat};
use pmgr_kernel::domain::constants::{IMAGE_MAX_SIDE, LOGO_MAX_SIDE, MAX_IMAGES_PER_PROJECT, fields};
use pmgr_kernel::domain::project::ProjectKey;
use pmgr_kernel::safe_nanoid;

/// Decodes `bytes` and returns the file extension to store it under.
fn decode(field: &'static str, label: &str, bytes: &[u8], max_side: u32) -> Result<&'static str, CatalogError> {
    let not_an_image = || {
        invalid(
            field,
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        )
    };
    let format = image::guess_format(bytes).map_err(|_| not_an_image())?;
    let ext = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        _ => return Err(not_an_image()),
    };

    let (width, height) = image::load_from_memory_with_format(bytes, format)
        .map_err(|_| not_an_image())?
        .dimensions();
    if width > max_side {
        return Err(invalid(field, format!("{label} width must be no more than {max_side}.")));
    }
    if height > max_side {
        return Err(invalid(field, format!("{label} height must be no more than {max_side}.")));
    }
    Ok(ext)
}

/// Next free `NNNN` stem after the highest numbered file among `taken` (names or media paths).
fn next_image_stem<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let highest = taken
        .into_iter()
        .filter_map(|path| path.rsplit('/').next()?.split('.').next()?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{:04}", highest + 1)
}

impl CatalogInner {
    /// Replaces the project's logo.
    ///
    /// # Errors
    ///
    /// Rejects undecodable images and logos larger than the allowed size.
    pub async fn set_logo(
        &self,
        key: &ProjectKey,
        bytes: Vec<u8>,
        actor: u64,
    ) -> Result<Project, CatalogError> {
        ensure_editor(self.store.read().project(key)?, actor)?;
        let (ext, bytes) = blocking(move || {
            let ext = decode(fields::LOGO, "Logo", &bytes, LOGO_MAX_SIDE)?;
            Ok((ext, bytes))
        })
        .await?;

        let file = format!("logos/{}.{ext}", key.media_dir());
        self.media.write(&file, &bytes).await?;

        let previous = {
            let mut state = self.store.write();
            let project = state.project_mut(key)?;
            let previous = project.logo.replace(file.clone());
            project.modified = Utc::now();
            previous
        };
        if let Some(previous) = previous.filter(|previous| *previous != file) {
            discard(&self.media, &previous).await;
        }
        self.project(key)
    }

    /// Adds a screenshot as `images/{project}/{NNNN}.{ext}`.
    ///
    /// # Errors
    ///
    /// Rejects undecodable or oversized images and projects at the image limit.
    pub async fn add_image(
        &self,
        key: &ProjectKey,
        bytes: Vec<u8>,
        actor: u64,
    ) -> Result<ProjectImage, CatalogError> {
        let limit_reached = || {
            invalid(
                fields::IMAGE,
                format!("Maximum number of images ({MAX_IMAGES_PER_PROJECT}) reached."),
            )
        };
        {
            let state = self.store.read();
            let project = state.project(key)?;
            ensure_editor(project, actor)?;
            if project.images.len() >= MAX_IMAGES_PER_PROJECT {
                return Err(limit_reached());
            }
        }

        let (ext, bytes) = blocking(move || {
            let ext = decode(fields::IMAGE, "Image", &bytes, IMAGE_MAX_SIDE)?;
            Ok((ext, bytes))
        })
        .await?;

        let dir = format!("images/{}", key.media_dir());
        let on_disk = self.media.list(&dir).await?;
        let file = {
            let mut state = self.store.write();
            let prefix = format!("{dir}/");
            let pending: Vec<String> =
                state.pending.iter().filter(|path| path.starts_with(&prefix)).cloned().collect();
            let project = state.project(key)?;
            if project.images.len() + pending.len() >= MAX_IMAGES_PER_PROJECT {
                return Err(limit_reached());
            }
            let taken = on_disk
                .iter()
                .map(String::as_str)
                .chain(project.images.iter().map(|image| image.file.as_str()))
                .chain(pending.iter().map(String::as_str));
            let file = format!("{dir}/{}.{ext}", next_image_stem(taken));
            state.pending.insert(file.clone());
            file
        };

        if let Err(err) = self.media.write(&file, &bytes).await {
            self.store.write().pending.remove(&file);
            return Err(err.into());
        }

        let added = {
            let mut state = self.store.write();
            state.pending.remove(&file);
            state.project_mut(key).and_then(|project| {
                if project.images.len() >= MAX_IMAGES_PER_PROJECT {
                    return Err(limit_reached());
                }
                let image = ProjectImage { id: safe_nanoid!(), file: file.clone(), created: Utc::now() };
                project.images.push(image.clone());
                project.modified = image.created;
                Ok(image)
            })
        };
        if added.is_err() {
            discard(&self.media, &file).await;
        }
        added
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown image ids.
    pub async fn remove_image(&self, key: &ProjectKey, id: &str, actor: u64) -> Result<(), CatalogError> {
        let file = {
            let mut state = self.store.write();
            let project = state.project_mut(key)?;
            ensure_editor(project, actor)?;
            let index = project
                .images
                .iter()
                .position(|image| image.id == id)
                .ok_or_else(|| CatalogError::not_found(format!("No image \"{id}\" found.")))?;
            project.modified = Utc::now();
            project.images.remove(index).file
        };
        discard(&self.media, &file).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_numbering_continues_after_highest() {
        assert_eq!(next_image_stem(std::iter::empty()), "0001");
        assert_eq!(next_image_stem(["0001.png", "0007.jpg", "notes.txt"]), "0008");
        assert_eq!(
            next_image_stem(["0002.png", "images/plugins/gungame/0003.webp"]),
            "0004"
        );
    }

    #[test]
    fn rejects_bytes_that_are_not_images() {
        let err = decode(fields::LOGO, "Logo", b"plain text", LOGO_MAX_SIDE).unwrap_err();
        assert_eq!(err.violation().map(|v| v.field), Some(fields::LOGO));
    }
}

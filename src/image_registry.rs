//! Image registry: owns the image resources of one document
//!
//! Layout refers to images by `ImageId`; the emitter writes each registered image
//! exactly once as an XObject and references it from every page that draws it.

use std::collections::HashMap;

use pdf_writer::{Filter, Name, Pdf, Ref};

use crate::error::{ReportError, ReportResult};
use crate::image_fit::ImageResource;

/// Stable handle to a registered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(usize);

impl ImageId {
    /// XObject resource name, e.g. "Im0"
    pub fn resource_name(self) -> String {
        format!("Im{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Vec<ImageResource>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource: ImageResource) -> ImageId {
        self.images.push(resource);
        ImageId(self.images.len() - 1)
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageResource> {
        self.images.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Write every image as an XObject. Returns image id → object ref.
    pub fn write_xobjects(
        &self,
        pdf: &mut Pdf,
        mut next_ref: impl FnMut() -> Ref,
    ) -> HashMap<ImageId, Ref> {
        let mut refs = HashMap::with_capacity(self.images.len());
        for (index, resource) in self.images.iter().enumerate() {
            let image_id = next_ref();
            match resource {
                ImageResource::Jpeg { data, pixel_width, pixel_height, components } => {
                    let mut xobject = pdf.image_xobject(image_id, data);
                    xobject.filter(Filter::DctDecode);
                    xobject.width(*pixel_width as i32);
                    xobject.height(*pixel_height as i32);
                    if *components == 1 {
                        xobject.color_space().device_gray();
                    } else {
                        xobject.color_space().device_rgb();
                    }
                    xobject.bits_per_component(8);
                }
                ImageResource::Flate { rgb, alpha, pixel_width, pixel_height } => {
                    // Soft mask first, so the image can point at it
                    let smask_id = alpha.as_ref().map(|alpha| {
                        let smask_id = next_ref();
                        let mut smask = pdf.image_xobject(smask_id, alpha);
                        smask.filter(Filter::FlateDecode);
                        smask.width(*pixel_width as i32);
                        smask.height(*pixel_height as i32);
                        smask.color_space().device_gray();
                        smask.bits_per_component(8);
                        smask_id
                    });

                    let mut xobject = pdf.image_xobject(image_id, rgb);
                    xobject.filter(Filter::FlateDecode);
                    xobject.width(*pixel_width as i32);
                    xobject.height(*pixel_height as i32);
                    xobject.color_space().device_rgb();
                    xobject.bits_per_component(8);
                    if let Some(smask_id) = smask_id {
                        xobject.s_mask(smask_id);
                    }
                }
            }
            refs.insert(ImageId(index), image_id);
        }
        refs
    }

    /// Write the images used on one page into its Resources.
    pub fn write_resources(
        used: &[ImageId],
        refs: &HashMap<ImageId, Ref>,
        resources: &mut pdf_writer::writers::Resources<'_>,
    ) -> ReportResult<()> {
        if used.is_empty() {
            return Ok(());
        }
        let mut dict = resources.x_objects();
        for id in used {
            let image_ref = refs.get(id).ok_or_else(|| {
                ReportError::Serialization(format!("page draws unregistered image {:?}", id))
            })?;
            let name = id.resource_name();
            dict.pair(Name(name.as_bytes()), *image_ref);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flate() -> ImageResource {
        ImageResource::Flate {
            rgb: vec![1, 2, 3],
            alpha: Some(vec![4]),
            pixel_width: 1,
            pixel_height: 1,
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = ImageRegistry::new();
        let a = registry.register(flate());
        let b = registry.register(flate());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(b.resource_name(), "Im1");
        assert!(registry.get(a).is_some());
    }

    #[test]
    fn test_soft_mask_gets_its_own_object() {
        let mut registry = ImageRegistry::new();
        let id = registry.register(flate());
        let mut pdf = Pdf::new();
        let mut next = 10;
        let refs = registry.write_xobjects(&mut pdf, || {
            next += 1;
            Ref::new(next)
        });
        assert_eq!(refs[&id], Ref::new(11));
        // image + smask
        assert_eq!(next, 12);
    }
}

//! Resource directory parsing

use super::{
    AnimDescriptor, BodyDescriptor, COLLISION_BOX_SIZE, Descriptor, OP_BODY, Resource,
    ResourceDirectory,
};
use crate::error::{Error, Result};
use crate::formats::reader::EntryReader;

/// Parse a decoded resource directory entry
///
/// The entry starts with a table of i32 offsets whose length is not stored:
/// the table ends once the read position reaches the first offset. The last
/// offset only bounds the final resource and is not a resource itself.
///
/// # Errors
/// Returns [`Error::UnterminatedResourceTable`] if the offset table runs off
/// the end of the entry, [`Error::InvalidDescriptor`] for malformed records
/// and [`Error::Truncated`] if a record is cut short.
pub fn parse_resource_directory(data: &[u8]) -> Result<ResourceDirectory> {
    let mut r = EntryReader::new(data);

    let mut offsets: Vec<i32> = Vec::new();
    loop {
        if r.remaining() < 4 {
            return Err(Error::UnterminatedResourceTable { len: data.len() });
        }
        offsets.push(r.i32()?);
        if i64::from(offsets[0]) == r.position() as i64 {
            break;
        }
    }
    tracing::debug!("Resource table: {} offsets", offsets.len());

    let mut resources = Vec::with_capacity(offsets.len() - 1);
    for pair in offsets.windows(2) {
        let (offset, next) = (pair[0], pair[1]);
        let mut resource = Resource {
            offset,
            ..Resource::default()
        };

        r.seek_forward(usize::try_from(offset).unwrap_or(0))?;
        let end = i64::from(next) - 1;
        while (r.position() as i64) < end {
            resource.push(read_descriptor(&mut r)?);
        }

        tracing::trace!(
            "Resource @{}: {} bodies, {} animations",
            offset,
            resource.bodies.len(),
            resource.animations.len()
        );
        resources.push(resource);
    }

    Ok(ResourceDirectory { resources })
}

fn read_descriptor(r: &mut EntryReader<'_>) -> Result<Descriptor> {
    let start = r.position();
    let op = r.u8()?;

    if op == OP_BODY {
        let index = r.u8()?;
        let data_size = r.u8()?;
        let real_index = r.i16()?;
        let has_collision_box = r.u8()? == 1;
        if has_collision_box {
            r.skip(COLLISION_BOX_SIZE)?;
        }
        return Ok(Descriptor::Body(BodyDescriptor {
            index,
            data_size,
            real_index,
            has_collision_box,
        }));
    }

    let index = r.u16()?;
    let data_size = r.u8()?;
    let real_index = r.u16()?;
    // data_size counts the real index and everything after it
    let extra = usize::from(data_size).checked_sub(3).ok_or_else(|| Error::InvalidDescriptor {
        offset: start,
        message: format!("animation data size {data_size} is smaller than 3"),
    })?;
    r.skip(extra)?;

    Ok(Descriptor::Anim(AnimDescriptor {
        index,
        data_size,
        real_index,
    }))
}

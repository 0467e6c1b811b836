//! X11 platform implementation for the edge overlay
//!
//! Uses XCB via x11rb for a transparent, always-on-top surface that covers
//! the target monitor. The input region is empty, so every click reaches the
//! windows underneath. Requires a compositor for transparency.

use std::fs::File;
use std::os::fd::AsFd;

use rustix::fs::{memfd_create, MemfdFlags};
use rustix::mm::{mmap, MapFlags, ProtFlags};
use x11rb::atom_manager;
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::shape::{self, ConnectionExt as _};
use x11rb::protocol::shm::{self, ConnectionExt as _};
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::{find_monitor_by_id, MonitorInfo, OverlayConfig, OverlayPlatform, PlatformError};

// Atoms needed for EWMH hints
atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DOCK,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_SKIP_TASKBAR,
        _NET_WM_STATE_SKIP_PAGER,
        ATOM,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Monitor Enumeration
// ─────────────────────────────────────────────────────────────────────────────

pub fn get_all_monitors() -> Vec<MonitorInfo> {
    let Ok((conn, screen_num)) = x11rb::connect(None) else {
        return Vec::new();
    };
    let root = conn.setup().roots[screen_num].root;
    query_monitors(&conn, root)
}

fn query_monitors(conn: &RustConnection, root: Window) -> Vec<MonitorInfo> {
    let Ok(monitors) = conn.randr_get_monitors(root, true) else {
        return Vec::new();
    };
    let Ok(monitors) = monitors.reply() else {
        return Vec::new();
    };

    monitors
        .monitors
        .iter()
        .enumerate()
        .map(|(idx, mon)| {
            let name = conn
                .get_atom_name(mon.name)
                .ok()
                .and_then(|r| r.reply().ok())
                .map(|r| String::from_utf8_lossy(&r.name).to_string())
                .unwrap_or_else(|| format!("Monitor {}", idx + 1));

            MonitorInfo {
                id: name.clone(),
                name,
                x: mon.x as i32,
                y: mon.y as i32,
                width: mon.width as u32,
                height: mon.height as u32,
                is_primary: mon.primary,
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// X11 Overlay Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// SHM buffer for efficient pixel transfer
struct ShmBuffer {
    seg_id: shm::Seg,
    ptr: *mut u8,
    size: usize,
}

// SAFETY: the buffer is only touched by the thread that owns the overlay
unsafe impl Send for ShmBuffer {}

pub struct X11Overlay {
    conn: RustConnection,
    root: Window,
    window: Window,
    gc: Gcontext,
    atoms: AtomCollection,
    width: u32,
    height: u32,
    depth: u8,

    pixel_data: Vec<u8>, // premultiplied RGBA from renderer
    /// None once released; release consumes the buffer
    shm_buffer: Option<ShmBuffer>,

    damaged: bool,
    running: bool,
}

impl X11Overlay {
    /// Find a 32-bit ARGB visual for transparency
    fn find_argb_visual(screen: &Screen) -> Option<(Visualid, u8)> {
        screen
            .allowed_depths
            .iter()
            .filter(|depth| depth.depth == 32)
            .flat_map(|depth| depth.visuals.iter().map(move |v| (v, depth.depth)))
            .find(|(visual, _)| visual.class == VisualClass::TRUE_COLOR)
            .map(|(visual, depth)| (visual.visual_id, depth))
    }

    /// Create a shared memory buffer for efficient pixel transfer
    fn create_shm_buffer(
        conn: &RustConnection,
        width: u32,
        height: u32,
    ) -> Result<ShmBuffer, PlatformError> {
        let size = (width * height * 4) as usize;

        let fd = memfd_create(c"edgeline-x11-buffer", MemfdFlags::CLOEXEC)
            .map_err(|e| PlatformError::BufferError(format!("memfd_create failed: {e}")))?;

        rustix::fs::ftruncate(&fd, size as u64)
            .map_err(|e| PlatformError::BufferError(format!("ftruncate failed: {e}")))?;

        // SAFETY: fresh anonymous mapping of a memfd we just sized
        let ptr = unsafe {
            mmap(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                fd.as_fd(),
                0,
            )
            .map_err(|e| PlatformError::BufferError(format!("mmap failed: {e}")))?
        };

        let unmap = || {
            // SAFETY: ptr/size come from the mmap above and are not shared yet
            unsafe {
                rustix::mm::munmap(ptr, size).ok();
            }
        };

        let seg_id = match conn.generate_id() {
            Ok(seg_id) => seg_id,
            Err(e) => {
                unmap();
                return Err(PlatformError::BufferError(e.to_string()));
            }
        };

        // shm_attach_fd takes ownership of the fd
        if let Err(e) = conn.shm_attach_fd(seg_id, File::from(fd), false) {
            unmap();
            return Err(PlatformError::BufferError(format!("shm_attach_fd failed: {e}")));
        }

        Ok(ShmBuffer {
            seg_id,
            ptr: ptr as *mut u8,
            size,
        })
    }

    fn release_shm_buffer(conn: &RustConnection, buffer: ShmBuffer) {
        let _ = conn.shm_detach(buffer.seg_id);
        // SAFETY: ptr/size come from the mmap in create_shm_buffer and the
        // buffer is consumed here, so the region is unmapped exactly once
        unsafe {
            rustix::mm::munmap(buffer.ptr as *mut _, buffer.size).ok();
        }
    }

    /// Recreate SHM buffer after the window was resized.
    ///
    /// The new buffer is created before the old one is released; on failure
    /// the old buffer stays attached and is released on drop.
    fn recreate_shm_buffer(&mut self) -> Result<(), PlatformError> {
        let buffer = Self::create_shm_buffer(&self.conn, self.width, self.height)?;
        if let Some(old) = self.shm_buffer.replace(buffer) {
            Self::release_shm_buffer(&self.conn, old);
        }
        self.pixel_data = vec![0u8; (self.width * self.height * 4) as usize];
        Ok(())
    }

    /// Set EWMH hints and the window name/class for compositor rules
    fn setup_window_hints(&self, namespace: &str) -> Result<(), PlatformError> {
        let other = |e: x11rb::errors::ConnectionError| PlatformError::Other(e.to_string());

        // Window type: dock (stays on top, no decorations)
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_WINDOW_TYPE,
                self.atoms.ATOM,
                &[self.atoms._NET_WM_WINDOW_TYPE_DOCK],
            )
            .map_err(other)?;

        // Window state: above, skip taskbar/pager
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_STATE,
                self.atoms.ATOM,
                &[
                    self.atoms._NET_WM_STATE_ABOVE,
                    self.atoms._NET_WM_STATE_SKIP_TASKBAR,
                    self.atoms._NET_WM_STATE_SKIP_PAGER,
                ],
            )
            .map_err(other)?;

        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                namespace.as_bytes(),
            )
            .map_err(other)?;

        let class = format!("{namespace}\0{namespace}\0");
        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                AtomEnum::WM_CLASS,
                AtomEnum::STRING,
                class.as_bytes(),
            )
            .map_err(other)?;

        Ok(())
    }

    /// Empty input region: clicks pass through to whatever is below
    fn clear_input_shape(&self) -> Result<(), PlatformError> {
        self.conn
            .shape_rectangles(
                shape::SO::SET,
                shape::SK::INPUT,
                ClipOrdering::UNSORTED,
                self.window,
                0,
                0,
                &[],
            )
            .map_err(|e| PlatformError::Other(e.to_string()))?;
        Ok(())
    }
}

impl OverlayPlatform for X11Overlay {
    fn new(config: OverlayConfig) -> Result<Self, PlatformError> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| PlatformError::ConnectionFailed(e.to_string()))?;
        let other = |e: x11rb::errors::ConnectionError| PlatformError::Other(e.to_string());

        let atoms = AtomCollection::new(&conn)
            .map_err(other)?
            .reply()
            .map_err(|e| PlatformError::Other(e.to_string()))?;

        let setup = conn.setup();
        let screen = &setup.roots[screen_num];
        let root = screen.root;

        // Check for required extensions
        conn.shape_query_version()
            .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?
            .reply()
            .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?;

        conn.shm_query_version()
            .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?
            .reply()
            .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?;

        let (visual, depth) = Self::find_argb_visual(screen)
            .ok_or_else(|| PlatformError::UnsupportedFeature("32-bit ARGB visual".into()))?;

        let colormap = conn
            .generate_id()
            .map_err(|e| PlatformError::Other(e.to_string()))?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, root, visual)
            .map_err(other)?;

        // Cover the target monitor, or the whole screen if RandR reports none
        let monitors = query_monitors(&conn, root);
        let (x, y, monitor_w, monitor_h) =
            find_monitor_by_id(&monitors, config.target_monitor_id.as_deref())
                .map(|m| (m.x, m.y, m.width, m.height))
                .unwrap_or((
                    0,
                    0,
                    screen.width_in_pixels as u32,
                    screen.height_in_pixels as u32,
                ));
        let (width, height) = config.size.unwrap_or((monitor_w, monitor_h));
        if width == 0 || height == 0 {
            return Err(PlatformError::Other(format!(
                "refusing to create {width}x{height} surface"
            )));
        }

        let window = conn
            .generate_id()
            .map_err(|e| PlatformError::Other(e.to_string()))?;

        let win_aux = CreateWindowAux::new()
            .background_pixel(0)
            .border_pixel(0)
            .colormap(colormap)
            .event_mask(EventMask::EXPOSURE | EventMask::STRUCTURE_NOTIFY)
            .override_redirect(1);

        conn.create_window(
            depth,
            window,
            root,
            x as i16,
            y as i16,
            width as u16,
            height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &win_aux,
        )
        .map_err(other)?;

        let gc = conn
            .generate_id()
            .map_err(|e| PlatformError::Other(e.to_string()))?;
        conn.create_gc(gc, window, &CreateGCAux::new())
            .map_err(other)?;

        let shm_buffer = Self::create_shm_buffer(&conn, width, height)?;

        let overlay = Self {
            conn,
            root,
            window,
            gc,
            atoms,
            width,
            height,
            depth,
            pixel_data: vec![0u8; (width * height * 4) as usize],
            shm_buffer: Some(shm_buffer),
            damaged: true,
            running: true,
        };

        overlay.setup_window_hints(&config.namespace)?;
        overlay.clear_input_shape()?;

        overlay.conn.map_window(window).map_err(other)?;
        overlay.conn.flush().map_err(other)?;

        tracing::info!(
            namespace = %config.namespace,
            x,
            y,
            width,
            height,
            "X11 overlay surface mapped"
        );
        Ok(overlay)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.pixel_data)
    }

    fn commit(&mut self) {
        let Some(buffer) = &self.shm_buffer else {
            return;
        };
        // a failed resize leaves the old, smaller buffer in place
        if buffer.size != self.pixel_data.len() {
            return;
        }
        // SAFETY: the mapping stays valid until release_shm_buffer consumes it
        let shm_slice = unsafe { std::slice::from_raw_parts_mut(buffer.ptr, buffer.size) };

        // RGBA -> BGRA
        for (src, dst) in self.pixel_data.chunks_exact(4).zip(shm_slice.chunks_exact_mut(4)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = src[3];
        }

        let _ = self.conn.shm_put_image(
            self.window,
            self.gc,
            self.width as u16,
            self.height as u16,
            0,
            0,
            self.width as u16,
            self.height as u16,
            0,
            0,
            self.depth,
            ImageFormat::Z_PIXMAP.into(),
            false,
            buffer.seg_id,
            0,
        );
        let _ = self.conn.flush();
    }

    fn poll_events(&mut self) -> bool {
        while let Ok(Some(event)) = self.conn.poll_for_event() {
            match event {
                Event::Expose(e) if e.count == 0 => {
                    self.damaged = true;
                }
                Event::ConfigureNotify(e) if e.window == self.window => {
                    let (width, height) = (e.width as u32, e.height as u32);
                    if (width, height) != (self.width, self.height) && width > 0 && height > 0 {
                        self.width = width;
                        self.height = height;
                        if let Err(e) = self.recreate_shm_buffer() {
                            tracing::error!(error = %e, "Failed to resize overlay buffer");
                            self.running = false;
                            return false;
                        }
                        self.damaged = true;
                    }
                }
                Event::DestroyNotify(e) if e.window == self.window => {
                    tracing::warn!("Overlay window destroyed externally");
                    self.running = false;
                    return false;
                }
                _ => {}
            }
        }
        self.running
    }

    fn take_damage(&mut self) -> bool {
        std::mem::take(&mut self.damaged)
    }

    fn get_monitors(&self) -> Vec<MonitorInfo> {
        query_monitors(&self.conn, self.root)
    }
}

impl Drop for X11Overlay {
    fn drop(&mut self) {
        if let Some(buffer) = self.shm_buffer.take() {
            Self::release_shm_buffer(&self.conn, buffer);
        }
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.flush();
    }
}

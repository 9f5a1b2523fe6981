use std::error::Error;
use std::fmt::Display;

use clap::Parser;
use log::{error, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::video::GLProfile;

use gltf_viewer::config::ViewerConfig;
use gltf_viewer::gltf::load_gltf_files;
use gltf_viewer::renderer::{gl, GlBackend, Renderer, ShaderProgram};

fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let asset = load_gltf_files(&config.model, &config.binary)?;

    let sdl_context = sdl2::init().map_err(SdlErr)?;
    let video_subsystem = sdl_context.video().map_err(SdlErr)?;
    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::GLES);
    gl_attr.set_context_version(3, 0);
    gl_attr.set_depth_size(24);
    let window = video_subsystem
        .window(&config.title, config.width, config.height)
        .resizable()
        .opengl()
        .build()?;
    let _gl_context = window.gl_create_context().map_err(SdlErr)?;
    gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const core::ffi::c_void);
    video_subsystem
        .gl_set_swap_interval(if config.no_vsync { 0 } else { 1 })
        .map_err(SdlErr)?;
    let (w, h) = window.drawable_size();
    gl::viewport(w as i32, h as i32);

    let program = ShaderProgram::from_files(&config.vertex_shader, &config.fragment_shader)?;
    let mut renderer = Renderer::new(GlBackend::new(program), &asset)?;
    info!("setup done, rendering {}", config.model.display());

    let mut event_pump = sdl_context.event_pump().map_err(SdlErr)?;
    let mut frames = 0;
    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (w, h) = window.drawable_size();
                    gl::viewport(w as i32, h as i32);
                }
                _ => {}
            }
        }

        gl::clear_frame();
        if let Err(err) = renderer.render(&asset) {
            error!("rendering frame {frames} failed: {err}");
            return Err(err.into());
        }
        window.gl_swap_window();

        frames += 1;
        if config.reached_frame_limit(frames) {
            info!("rendered {frames} frames, exiting");
            break;
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct SdlErr(String);
impl Display for SdlErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sdl error: {}", self.0)
    }
}
impl Error for SdlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

use glam::{EulerRot, Mat4};
use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::camera::Camera;
use crate::error::{Result, VizError};
use crate::frame::{Blend, Layer, Primitive, RenderSurface, RenderableFrame, Shade};

use super::js_err;

const POSITION_ATTRIB: u32 = 0;
const COLOR_ATTRIB: u32 = 1;

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;
uniform mat4 u_mvp;
uniform float u_point_size;
uniform float u_point_scale;
out vec3 v_color;
void main() {
    vec4 clip = u_mvp * vec4(a_position, 1.0);
    gl_Position = clip;
    // size attenuation: world-space diameter shrinks with depth
    gl_PointSize = max(1.0, u_point_size * u_point_scale / clip.w);
    v_color = a_color;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec3 v_color;
uniform float u_opacity;
out vec4 out_color;
void main() {
    out_color = vec4(v_color, u_opacity);
}
"#;

struct Uniforms {
    mvp: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
    point_scale: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

/// WebGL2 drawing surface bound to one canvas.
pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    colors: WebGlBuffer,
    uniforms: Uniforms,
}

impl WebGlSurface {
    /// Create a transparent, antialiased WebGL2 context on `canvas`.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let options = Object::new();
        Reflect::set(&options, &"alpha".into(), &JsValue::TRUE).map_err(js_err)?;
        Reflect::set(&options, &"antialias".into(), &JsValue::TRUE).map_err(js_err)?;

        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(js_err)?
            .ok_or_else(|| VizError::Gl("WebGL2 not supported".into()))?
            .dyn_into()
            .map_err(|_| VizError::Gl("context is not WebGL2".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| VizError::Gl("failed to create vertex array".into()))?;
        let positions = create_buffer(&gl)?;
        let colors = create_buffer(&gl)?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&positions));
        gl.vertex_attrib_pointer_with_i32(POSITION_ATTRIB, 3, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(POSITION_ATTRIB);
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&colors));
        gl.vertex_attrib_pointer_with_i32(COLOR_ATTRIB, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let uniforms = Uniforms {
            mvp: gl.get_uniform_location(&program, "u_mvp"),
            point_size: gl.get_uniform_location(&program, "u_point_size"),
            point_scale: gl.get_uniform_location(&program, "u_point_scale"),
            opacity: gl.get_uniform_location(&program, "u_opacity"),
        };

        gl.enable(GL::BLEND);
        gl.disable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            positions,
            colors,
            uniforms,
        })
    }

    fn draw_layer(&self, view_projection: Mat4, layer: &Layer<'_>) {
        let gl = &self.gl;
        let count = layer.vertex_count();
        if count == 0 {
            return;
        }

        let model = Mat4::from_euler(
            EulerRot::XYZ,
            layer.rotation.x,
            layer.rotation.y,
            layer.rotation.z,
        );
        let mvp = view_projection * model;
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.mvp.as_ref(), false, &mvp.to_cols_array());
        gl.uniform1f(self.uniforms.point_size.as_ref(), layer.point_size);
        gl.uniform1f(self.uniforms.opacity.as_ref(), layer.opacity);

        upload(gl, &self.positions, layer.positions);
        match layer.shade {
            Shade::Uniform(color) => {
                gl.disable_vertex_attrib_array(COLOR_ATTRIB);
                gl.vertex_attrib3f(COLOR_ATTRIB, color.r, color.g, color.b);
            }
            Shade::PerVertex(colors) => {
                upload(gl, &self.colors, colors);
                gl.enable_vertex_attrib_array(COLOR_ATTRIB);
            }
        }

        match layer.blend {
            Blend::Normal => gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA),
            Blend::Additive => gl.blend_func(GL::SRC_ALPHA, GL::ONE),
        }

        let mode = match layer.primitive {
            Primitive::Points => GL::POINTS,
            Primitive::Lines => GL::LINES,
        };
        gl.draw_arrays(mode, 0, count as i32);
    }
}

impl RenderSurface for WebGlSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn draw(&mut self, camera: &Camera, frame: &RenderableFrame<'_>) -> Result<()> {
        if self.gl.is_context_lost() {
            return Err(VizError::Gl("context lost".into()));
        }

        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.uniform1f(
            self.uniforms.point_scale.as_ref(),
            self.canvas.height() as f32 * 0.5,
        );

        let view_projection = camera.view_projection();
        for layer in &frame.layers {
            self.draw_layer(view_projection, layer);
        }

        self.gl.bind_vertex_array(None);
        Ok(())
    }
}

fn upload(gl: &GL, buffer: &WebGlBuffer, data: &[f32]) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    // SAFETY: the view is consumed by `buffer_data` before any allocation
    // can move the wasm memory it points into.
    unsafe {
        let view = Float32Array::view(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::DYNAMIC_DRAW);
    }
}

fn create_buffer(gl: &GL) -> Result<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| VizError::Gl("failed to create buffer".into()))
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src)?;
    let program = gl
        .create_program()
        .ok_or_else(|| VizError::Gl("failed to create program".into()))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    if linked {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".to_string());
        Err(VizError::Gl(format!("failed to link program: {info}")))
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| VizError::Gl("failed to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        Err(VizError::Gl(format!("failed to compile shader: {info}")))
    }
}
